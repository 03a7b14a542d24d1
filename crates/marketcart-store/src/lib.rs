//! # Marketcart Store
//!
//! Persistence adapter for marketcart. Provides a trait-based interface for
//! durable key-value storage with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The cart only ever needs two calls: read one string by key at startup,
//! and replace that string after each mutation. [`KvStore`] captures exactly
//! that contract so the cart is storage-agnostic. The durable implementation
//! is [`SqliteStore`]; [`MemoryStore`] is for tests and ephemeral sessions.
//!
//! ## Key Types
//!
//! - [`KvStore`] - The async trait for all storage operations
//! - [`SqliteStore`] - SQLite-based persistent storage
//! - [`MemoryStore`] - In-memory storage
//!
//! ## Usage
//!
//! ```rust,no_run
//! use marketcart_store::{KvStore, SqliteStore};
//!
//! async fn example() {
//!     let store = SqliteStore::open("cart.db").unwrap();
//!
//!     store.set("@GoMarketPlace:products", "[]").await.unwrap();
//!     let raw = store.get("@GoMarketPlace:products").await.unwrap();
//!     assert_eq!(raw.as_deref(), Some("[]"));
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **Whole-value writes**: `set` replaces any prior value at the key
//! - **Absent is not an error**: `get` on an unknown key returns `Ok(None)`

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::KvStore;
