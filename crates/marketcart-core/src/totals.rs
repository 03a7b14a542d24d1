//! Derived totals over a cart snapshot.
//!
//! These are pure functions of the supplied line items. Currency formatting
//! is left to the presentation layer; only the raw numbers live here.

use crate::item::LineItem;

/// Sum of `quantity` across all line items.
///
/// Can be negative when quantities have been decremented below zero.
/// Saturates instead of overflowing.
pub fn item_count(items: &[LineItem]) -> i64 {
    items
        .iter()
        .fold(0i64, |count, item| count.saturating_add(item.quantity))
}

/// Sum of `price * quantity` across all line items.
pub fn subtotal(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::line_total).sum()
}

/// Item count and subtotal computed together.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub item_count: i64,
    pub subtotal: f64,
}

impl Totals {
    pub fn of(items: &[LineItem]) -> Self {
        Self {
            item_count: item_count(items),
            subtotal: subtotal(items),
        }
    }
}
