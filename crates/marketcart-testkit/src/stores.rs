//! Instrumented KvStore implementations for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use marketcart_store::{KvStore, MemoryStore, Result, StoreError};

/// A memory store that remembers every write, in order.
///
/// An optional per-write delay makes persistence observably slower than
/// mutation.
#[derive(Debug, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    writes: Mutex<Vec<(String, String)>>,
    write_delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` stored under `key` (not counted as a write).
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            inner: MemoryStore::with_entry(key, value),
            ..Self::default()
        }
    }

    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    /// Every `(key, value)` written so far.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().expect("writes lock").clone()
    }

    /// Values written so far, in order.
    pub fn values(&self) -> Vec<String> {
        self.writes().into_iter().map(|(_, value)| value).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("writes lock").len()
    }

    /// The most recently written value.
    pub fn last_value(&self) -> Option<String> {
        self.writes().pop().map(|(_, value)| value)
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if let Some(delay) = self.write_delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.set(key, value).await?;
        self.writes
            .lock()
            .expect("writes lock")
            .push((key.to_owned(), value.to_owned()));
        Ok(())
    }
}

/// A memory store whose reads and writes can be made to fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    failed_writes: AtomicUsize,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write.
    pub fn rejecting_writes() -> Self {
        let store = Self::new();
        store.set_fail_writes(true);
        store
    }

    /// A store that rejects every read.
    pub fn rejecting_reads() -> Self {
        let store = Self::new();
        store.set_fail_reads(true);
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes.load(Ordering::SeqCst)
    }

    /// Read straight from the backing map, bypassing failure injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.inner.get(key).await.ok().flatten()
    }
}

#[async_trait]
impl KvStore for FailingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Backend(format!("injected read failure for {key}")));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            self.failed_writes.fetch_add(1, Ordering::SeqCst);
            return Err(StoreError::Backend(format!("injected write failure for {key}")));
        }
        self.inner.set(key, value).await
    }
}
