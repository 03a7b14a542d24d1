//! The cart: an ordered collection of line items, unique by id.
//!
//! All mutations go through [`Cart::add`], [`Cart::increment`] and
//! [`Cart::decrement`]. Each reports what it did as a [`Mutation`] so the
//! caller can decide whether anything needs to be persisted.

use serde::{Deserialize, Serialize};

use crate::item::{LineItem, Product};
use crate::totals::Totals;
use crate::types::ProductId;

/// Outcome of a single cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// A new line item was appended with the given quantity (always 1).
    Inserted { quantity: i64 },
    /// The product already existed; metadata was refreshed and quantity bumped.
    Merged { quantity: i64 },
    /// Quantity of an existing line item was adjusted.
    Adjusted { quantity: i64 },
    /// No line item carries the requested id. Nothing changed.
    NotFound,
}

impl Mutation {
    /// Whether the cart was changed.
    pub fn is_change(&self) -> bool {
        !matches!(self, Mutation::NotFound)
    }

    /// The resulting quantity of the touched line item, if any.
    pub fn quantity(&self) -> Option<i64> {
        match *self {
            Mutation::Inserted { quantity }
            | Mutation::Merged { quantity }
            | Mutation::Adjusted { quantity } => Some(quantity),
            Mutation::NotFound => None,
        }
    }
}

/// Ordered collection of line items.
///
/// Invariant: at most one line item per [`ProductId`]. Insertion order is
/// kept for presentation only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items that are already known to be unique by id.
    ///
    /// Use [`crate::validate_items`] first when the items come from outside.
    pub(crate) fn from_items_unchecked(items: Vec<LineItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LineItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&LineItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Add one unit of `product`.
    ///
    /// If a line item with the same id exists, its quantity goes up by one
    /// and its title, image and price are replaced by the incoming ones.
    /// Otherwise a new line item is appended with quantity 1.
    pub fn add(&mut self, product: Product) -> Mutation {
        match self.get_mut(&product.id) {
            Some(item) => {
                item.refresh(product);
                item.quantity = item.quantity.saturating_add(1);
                Mutation::Merged {
                    quantity: item.quantity,
                }
            }
            None => {
                self.items.push(LineItem::from_product(product, 1));
                Mutation::Inserted { quantity: 1 }
            }
        }
    }

    /// Raise the quantity of `id` by one.
    ///
    /// Quantities saturate at the `i64` bounds.
    pub fn increment(&mut self, id: &ProductId) -> Mutation {
        self.adjust(id, 1)
    }

    /// Lower the quantity of `id` by one.
    ///
    /// The line item stays in the cart even when its quantity drops to zero
    /// or below.
    pub fn decrement(&mut self, id: &ProductId) -> Mutation {
        self.adjust(id, -1)
    }

    /// Derived totals for the current contents.
    pub fn totals(&self) -> Totals {
        Totals::of(&self.items)
    }

    fn adjust(&mut self, id: &ProductId, delta: i64) -> Mutation {
        match self.get_mut(id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(delta);
                Mutation::Adjusted {
                    quantity: item.quantity,
                }
            }
            None => Mutation::NotFound,
        }
    }

    fn get_mut(&mut self, id: &ProductId) -> Option<&mut LineItem> {
        self.items.iter_mut().find(|item| &item.id == id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a LineItem;
    type IntoIter = std::slice::Iter<'a, LineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, format!("Product {id}"), format!("https://img/{id}.png"), price)
    }

    #[test]
    fn test_add_new_product_starts_at_one() {
        let mut cart = Cart::new();
        let outcome = cart.add(product("a", 10.0));

        assert_eq!(outcome, Mutation::Inserted { quantity: 1 });
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&"a".into()).unwrap().quantity, 1);
    }

    #[test]
    fn test_add_existing_product_merges() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        let outcome = cart.add(product("a", 10.0));

        assert_eq!(outcome, Mutation::Merged { quantity: 2 });
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_add_existing_product_refreshes_metadata() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(Product::new("a", "Renamed", "https://img/new.png", 12.0));

        let item = cart.get(&"a".into()).unwrap();
        assert_eq!(item.title, "Renamed");
        assert_eq!(item.image_url, "https://img/new.png");
        assert_eq!(item.price, 12.0);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut cart = Cart::new();
        cart.add(product("b", 1.0));
        cart.add(product("a", 1.0));
        cart.add(product("b", 1.0));

        let ids: Vec<&str> = cart.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_increment_changes_only_quantity() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        let before = cart.get(&"a".into()).unwrap().clone();

        assert_eq!(cart.increment(&"a".into()), Mutation::Adjusted { quantity: 2 });

        let after = cart.get(&"a".into()).unwrap();
        assert_eq!(after.quantity, before.quantity + 1);
        assert_eq!(after.title, before.title);
        assert_eq!(after.image_url, before.image_url);
        assert_eq!(after.price, before.price);
    }

    #[test]
    fn test_increment_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        let before = cart.clone();

        assert_eq!(cart.increment(&"zzz".into()), Mutation::NotFound);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_decrement_to_zero_keeps_item() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));

        assert_eq!(cart.decrement(&"a".into()), Mutation::Adjusted { quantity: 0 });
        assert!(cart.contains(&"a".into()));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_below_zero_goes_negative() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.decrement(&"a".into());
        cart.decrement(&"a".into());

        assert_eq!(cart.get(&"a".into()).unwrap().quantity, -1);
        assert_eq!(cart.totals().item_count, -1);
    }

    #[test]
    fn test_zero_quantity_row_can_be_readded() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.decrement(&"a".into());

        assert_eq!(cart.add(product("a", 10.0)), Mutation::Merged { quantity: 1 });
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_decrement_missing_is_noop() {
        let mut cart = Cart::new();
        assert_eq!(cart.decrement(&"a".into()), Mutation::NotFound);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_add_increment_scenario() {
        let mut cart = Cart::new();
        cart.add(product("a", 10.0));
        cart.add(product("a", 10.0));
        cart.increment(&"a".into());

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&"a".into()).unwrap().quantity, 3);

        let totals = cart.totals();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, 30.0);
    }

    #[test]
    fn test_quantities_saturate_at_bounds() {
        let mut cart = Cart::from_items_unchecked(vec![
            LineItem::from_product(product("max", 1.0), i64::MAX),
            LineItem::from_product(product("min", 1.0), i64::MIN),
        ]);

        assert_eq!(cart.increment(&"max".into()), Mutation::Adjusted { quantity: i64::MAX });
        assert_eq!(cart.add(product("max", 1.0)), Mutation::Merged { quantity: i64::MAX });
        assert_eq!(cart.decrement(&"min".into()), Mutation::Adjusted { quantity: i64::MIN });
        assert_eq!(cart.totals().item_count, -1);
    }

    #[test]
    fn test_mutation_helpers() {
        assert!(Mutation::Inserted { quantity: 1 }.is_change());
        assert!(!Mutation::NotFound.is_change());
        assert_eq!(Mutation::Adjusted { quantity: -2 }.quantity(), Some(-2));
        assert_eq!(Mutation::NotFound.quantity(), None);
    }
}
