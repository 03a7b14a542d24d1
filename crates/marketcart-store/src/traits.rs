//! KvStore trait: the abstract interface for snapshot persistence.
//!
//! This trait allows the cart to be storage-agnostic. Implementations
//! include SQLite (primary) and in-memory (for tests).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// Async string key-value storage.
///
/// # Design Notes
///
/// - `get` returns `Ok(None)` when nothing is stored under the key.
/// - `set` durably replaces any prior value at the key.
/// - Implementations must be safe to call from any task; the cart calls
///   `set` from a single writer task, so no ordering between concurrent
///   `set`s is required of the backend.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any prior value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}

#[async_trait]
impl<S: KvStore + ?Sized> KvStore for Box<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }
}
