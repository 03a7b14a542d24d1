//! Proptest generators for property-based testing.

use proptest::prelude::*;

use marketcart_core::{Cart, Mutation, Product, ProductId};

/// Ids drawn from a small pool so that merges and hits are common.
pub fn product_id() -> impl Strategy<Value = ProductId> {
    prop::sample::select(vec!["a", "b", "c", "d", "e"]).prop_map(ProductId::from)
}

/// A non-negative price in quarter steps.
///
/// Quarters are exact in binary, so snapshot round-trips compare equal.
pub fn price() -> impl Strategy<Value = f64> {
    (0u32..40_000).prop_map(|quarters| f64::from(quarters) * 0.25)
}

/// A product with random metadata.
pub fn product() -> impl Strategy<Value = Product> {
    (product_id(), "[A-Za-z ]{1,24}", "[a-z]{1,12}", price()).prop_map(
        |(id, title, image, price)| Product {
            id,
            title,
            image_url: format!("https://cdn.example.com/{image}.png"),
            price,
        },
    )
}

/// One cart operation.
#[derive(Debug, Clone)]
pub enum CartOp {
    Add(Product),
    Increment(ProductId),
    Decrement(ProductId),
}

impl CartOp {
    /// Apply to a plain cart.
    pub fn apply(&self, cart: &mut Cart) -> Mutation {
        match self {
            CartOp::Add(product) => cart.add(product.clone()),
            CartOp::Increment(id) => cart.increment(id),
            CartOp::Decrement(id) => cart.decrement(id),
        }
    }

    pub fn id(&self) -> &ProductId {
        match self {
            CartOp::Add(product) => &product.id,
            CartOp::Increment(id) | CartOp::Decrement(id) => id,
        }
    }
}

pub fn cart_op() -> impl Strategy<Value = CartOp> {
    prop_oneof![
        2 => product().prop_map(CartOp::Add),
        1 => product_id().prop_map(CartOp::Increment),
        1 => product_id().prop_map(CartOp::Decrement),
    ]
}

/// A sequence of up to `max_len` operations.
pub fn cart_ops(max_len: usize) -> impl Strategy<Value = Vec<CartOp>> {
    prop::collection::vec(cart_op(), 0..=max_len)
}

/// Apply a sequence of operations to a fresh cart.
pub fn apply_ops(ops: &[CartOp]) -> Cart {
    let mut cart = Cart::new();
    for op in ops {
        op.apply(&mut cart);
    }
    cart
}
