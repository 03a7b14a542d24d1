//! Snapshot encoding: the persisted form of a cart.
//!
//! A snapshot is a JSON array of line item objects with the fields
//! `id`, `title`, `image_url`, `price` and `quantity`. Snapshots are always
//! written whole; there are no deltas.
//!
//! Decoding is strict ([`decode`]) but loading is forgiving
//! ([`decode_or_empty`]): an absent or malformed snapshot yields an empty
//! cart together with a [`SnapshotStatus`] describing what happened.

use crate::cart::Cart;
use crate::error::{CoreError, Result};
use crate::item::LineItem;
use crate::validation::validate_items;

/// Default storage namespace.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketPlace";

/// Suffix appended to the namespace to form the cart's storage key.
const PRODUCTS_SUFFIX: &str = "products";

/// The fixed key a cart snapshot lives under for a given namespace.
pub fn storage_key(namespace: &str) -> String {
    format!("{namespace}:{PRODUCTS_SUFFIX}")
}

/// Encode a cart as a JSON snapshot.
pub fn encode(cart: &Cart) -> Result<String> {
    serde_json::to_string(cart).map_err(|e| CoreError::Encoding(e.to_string()))
}

/// Decode and validate a JSON snapshot.
pub fn decode(raw: &str) -> Result<Cart> {
    let items: Vec<LineItem> =
        serde_json::from_str(raw).map_err(|e| CoreError::Decoding(e.to_string()))?;
    validate_items(&items)?;
    Ok(Cart::from_items_unchecked(items))
}

/// What loading a stored snapshot produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotStatus {
    /// A snapshot was found and restored with this many line items.
    Restored(usize),
    /// Nothing was stored under the key.
    Absent,
    /// A value was stored but could not be decoded; the cart starts empty.
    Discarded(String),
    /// The store itself could not be read.
    Unavailable(String),
}

impl SnapshotStatus {
    pub fn is_restored(&self) -> bool {
        matches!(self, SnapshotStatus::Restored(_))
    }
}

/// Decode an optional stored value, falling back to an empty cart.
pub fn decode_or_empty(raw: Option<&str>) -> (Cart, SnapshotStatus) {
    match raw {
        None => (Cart::new(), SnapshotStatus::Absent),
        Some(raw) => match decode(raw) {
            Ok(cart) => {
                let count = cart.len();
                (cart, SnapshotStatus::Restored(count))
            }
            Err(e) => (Cart::new(), SnapshotStatus::Discarded(e.to_string())),
        },
    }
}
