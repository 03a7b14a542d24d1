//! # Marketcart
//!
//! Client-side shopping cart state for a storefront app: which products the
//! user has added, in what quantities, persisted across restarts.
//!
//! ## Overview
//!
//! - **Cart scope**: [`CartStore`] owns the authoritative in-memory cart and
//!   is the only writer of persisted state. The host creates it at startup
//!   and closes it at shutdown.
//! - **Handles**: [`CartHandle`] is what screens and widgets hold. It exposes
//!   `add_to_cart`, `increment`, `decrement`, read access, totals, and a
//!   change subscription. Using a handle after its scope ended is an error.
//! - **Persistence**: every change schedules one write of the full cart to a
//!   [`store::KvStore`]. Writes run on a single task in mutation order and
//!   never block the caller. Failures are logged and published, never rolled
//!   back.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketcart::{CartConfig, CartStore, Product};
//! use marketcart::store::SqliteStore;
//!
//! async fn example() -> marketcart::Result<()> {
//!     let store = SqliteStore::open("cart.db")?;
//!     let cart_store = CartStore::open(store, CartConfig::default()).await;
//!
//!     let cart = cart_store.handle();
//!     cart.add_to_cart(Product::new("42", "Mug", "https://img/mug.png", 9.9))?;
//!     cart.increment(&"42".into())?;
//!
//!     let totals = cart.totals()?;
//!     assert_eq!(totals.item_count, 2);
//!
//!     cart_store.close().await
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `marketcart::core` - Data model, totals, snapshot codec
//! - `marketcart::store` - Storage abstraction and SQLite

pub mod cart_store;
pub mod config;
pub mod error;
pub mod handle;
pub mod writer;

// Re-export component crates
pub use marketcart_core as core;
pub use marketcart_store as store;

pub use cart_store::CartStore;
pub use config::CartConfig;
pub use error::{CartError, Result};
pub use handle::CartHandle;
pub use writer::{PersistFailure, StorageOp};

// Re-export commonly used core types
pub use marketcart_core::{Cart, LineItem, Mutation, Product, ProductId, SnapshotStatus, Totals};
