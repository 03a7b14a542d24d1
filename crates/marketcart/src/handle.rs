//! CartHandle: what the presentation layer holds.
//!
//! A handle is a cheap, cloneable, weak view onto a [`crate::CartStore`]
//! scope. Every call first checks that the scope is still alive and fails
//! with [`CartError::OutOfScope`] when it is not.

use std::sync::{Arc, Weak};

use marketcart_core::{Cart, Mutation, Product, ProductId, Totals};
use tokio::sync::{broadcast, watch};

use crate::cart_store::{wait_flushed, Shared};
use crate::error::{CartError, Result};
use crate::writer::PersistFailure;

/// Scoped, subscribable handle onto the cart.
#[derive(Clone)]
pub struct CartHandle {
    shared: Weak<Shared>,
}

impl CartHandle {
    pub(crate) fn new(shared: Weak<Shared>) -> Self {
        Self { shared }
    }

    fn scope(&self) -> Result<Arc<Shared>> {
        self.shared.upgrade().ok_or(CartError::OutOfScope)
    }

    /// Whether the owning scope is still open.
    pub fn is_in_scope(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Add one unit of `product`, merging with an existing line item.
    pub fn add_to_cart(&self, product: Product) -> Result<Mutation> {
        let shared = self.scope()?;
        let id = product.id.clone();
        Ok(shared.apply("add_to_cart", &id, move |cart| cart.add(product)))
    }

    /// Raise the quantity of `id` by one. Missing ids are a no-op.
    pub fn increment(&self, id: &ProductId) -> Result<Mutation> {
        let shared = self.scope()?;
        Ok(shared.apply("increment", id, |cart| cart.increment(id)))
    }

    /// Lower the quantity of `id` by one. Missing ids are a no-op.
    ///
    /// The line item is kept even at zero or negative quantity.
    pub fn decrement(&self, id: &ProductId) -> Result<Mutation> {
        let shared = self.scope()?;
        Ok(shared.apply("decrement", id, |cart| cart.decrement(id)))
    }

    /// Copy of the current cart.
    pub fn products(&self) -> Result<Cart> {
        Ok(self.scope()?.snapshot())
    }

    /// Item count and subtotal of the current cart.
    pub fn totals(&self) -> Result<Totals> {
        Ok(self.scope()?.totals())
    }

    /// Receiver that is notified after every change to the cart.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.scope()?.subscribe())
    }

    /// Receiver for storage failures the cart swallowed.
    pub fn failures(&self) -> Result<broadcast::Receiver<PersistFailure>> {
        Ok(self.scope()?.failures())
    }

    /// Wait until every write issued before this call has been attempted.
    pub async fn flush(&self) -> Result<()> {
        // Do not keep the scope alive across the await.
        let rx = self.scope()?.flush_request()?;
        wait_flushed(rx).await
    }
}

impl std::fmt::Debug for CartHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartHandle")
            .field("in_scope", &self.is_in_scope())
            .finish()
    }
}
