//! Products and line items.

use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A purchasable product as handed to the cart by the presentation layer.
///
/// This is a line item without a quantity. The cart trusts it to be valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    /// Unit price, currency-agnostic.
    pub price: f64,
}

impl Product {
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// One distinct product held in the cart.
///
/// `quantity` is the only field the cart mutates after creation. It is
/// signed: decrementing never removes the item, so it can reach zero or go
/// below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: ProductId,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: i64,
}

impl LineItem {
    /// Create a line item holding `quantity` units of `product`.
    pub fn from_product(product: Product, quantity: i64) -> Self {
        Self {
            id: product.id,
            title: product.title,
            image_url: product.image_url,
            price: product.price,
            quantity,
        }
    }

    /// `price * quantity` for this line.
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Replace the descriptive fields with fresher product metadata.
    pub(crate) fn refresh(&mut self, product: Product) {
        debug_assert_eq!(self.id, product.id);
        self.title = product.title;
        self.image_url = product.image_url;
        self.price = product.price;
    }
}
