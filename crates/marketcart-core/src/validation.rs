//! Structural validation of line items arriving from outside the process.

use std::collections::HashSet;

use crate::error::{CoreError, Result};
use crate::item::LineItem;

/// Check that no two line items share an id.
///
/// Items built through [`crate::Cart`] mutations always satisfy this; a
/// stored snapshot is only trusted after passing it.
pub fn validate_items(items: &[LineItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(&item.id) {
            return Err(CoreError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
