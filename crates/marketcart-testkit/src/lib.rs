//! # Marketcart Testkit
//!
//! Testing utilities for marketcart.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Stores**: [`RecordingStore`] keeps every write in order, and
//!   [`FailingStore`] fails reads or writes on demand
//! - **Generators**: Proptest strategies for products and operation sequences
//! - **Fixtures**: A small catalog and helpers for building carts
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use marketcart_testkit::generators::{cart_ops, apply_ops};
//!
//! proptest! {
//!     #[test]
//!     fn ids_stay_unique(ops in cart_ops(40)) {
//!         let cart = apply_ops(&ops);
//!         prop_assert!(marketcart_core::validate_items(cart.items()).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod stores;

pub use fixtures::{catalog, init_tracing, product, snapshot_of};
pub use generators::{apply_ops, cart_ops, CartOp};
pub use stores::{FailingStore, RecordingStore};
