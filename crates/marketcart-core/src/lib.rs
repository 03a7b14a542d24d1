//! # Marketcart Core
//!
//! Pure primitives for the marketcart state container: line items, the cart
//! collection and its mutations, derived totals, and the snapshot format.
//!
//! This crate contains no I/O and no async code. Everything here is plain
//! computation over owned values, so it can be tested exhaustively without a
//! runtime.
//!
//! ## Key Types
//!
//! - [`ProductId`] - Opaque identifier, the merge/lookup key of a line item
//! - [`Product`] - What a caller hands to the cart (a line item without quantity)
//! - [`LineItem`] - One distinct product held in the cart, with its quantity
//! - [`Cart`] - Ordered collection of line items, unique by id
//! - [`Totals`] - Item count and raw subtotal derived from a cart
//!
//! ## Snapshots
//!
//! A cart is persisted as a JSON array of line items. See [`snapshot`].

pub mod cart;
pub mod error;
pub mod item;
pub mod snapshot;
pub mod totals;
pub mod types;
pub mod validation;

pub use cart::{Cart, Mutation};
pub use error::{CoreError, Result};
pub use item::{LineItem, Product};
pub use snapshot::{decode, decode_or_empty, encode, storage_key, SnapshotStatus, DEFAULT_NAMESPACE};
pub use totals::{item_count, subtotal, Totals};
pub use types::ProductId;
pub use validation::validate_items;
