//! The CartStore: owner of the cart state and of its persistence.
//!
//! A `CartStore` is the explicit scope the host application creates at
//! startup and closes (or drops) at shutdown. Presentation code never sees
//! it directly; it receives [`CartHandle`]s, which stop working once the
//! scope ends.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use marketcart_core::{decode_or_empty, Cart, Mutation, ProductId, SnapshotStatus, Totals};
use marketcart_store::{KvStore, SqliteStore};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::handle::CartHandle;
use crate::writer::{PersistFailure, PersistJob, StorageOp, Writer, WriterCommand};

/// State shared between a scope and its handles.
pub(crate) struct Shared {
    key: String,
    state: watch::Sender<Cart>,
    revision: AtomicU64,
    writes: mpsc::UnboundedSender<WriterCommand>,
    failures: broadcast::Sender<PersistFailure>,
}

impl Shared {
    /// Apply a mutation and, if it changed anything, enqueue the new cart.
    ///
    /// The enqueue happens inside the watch write lock so that concurrent
    /// callers enqueue in the same order they mutated.
    pub(crate) fn apply<F>(&self, op: &'static str, id: &ProductId, f: F) -> Mutation
    where
        F: FnOnce(&mut Cart) -> Mutation,
    {
        let mut outcome = Mutation::NotFound;
        self.state.send_if_modified(|cart| {
            outcome = f(cart);
            if !outcome.is_change() {
                return false;
            }

            let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
            let job = PersistJob {
                revision,
                cart: cart.clone(),
            };
            if self.writes.send(WriterCommand::Persist(job)).is_err() {
                warn!(key = %self.key, revision, "cart writer is gone; change kept in memory only");
            }
            true
        });

        debug!(op, id = %id, ?outcome, "cart mutation");
        outcome
    }

    pub(crate) fn snapshot(&self) -> Cart {
        self.state.borrow().clone()
    }

    pub(crate) fn totals(&self) -> Totals {
        self.state.borrow().totals()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Cart> {
        self.state.subscribe()
    }

    pub(crate) fn failures(&self) -> broadcast::Receiver<PersistFailure> {
        self.failures.subscribe()
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    /// Queue a flush marker behind every write issued so far.
    pub(crate) fn flush_request(&self) -> Result<oneshot::Receiver<()>> {
        let (tx, rx) = oneshot::channel();
        self.writes
            .send(WriterCommand::Flush(tx))
            .map_err(|_| CartError::WriterStopped)?;
        Ok(rx)
    }

    /// Replace the whole cart without scheduling a write.
    ///
    /// Subscribers are only notified when the contents actually differ.
    fn replace(&self, cart: Cart) {
        self.state.send_if_modified(|current| {
            if *current == cart {
                return false;
            }
            *current = cart;
            self.revision.fetch_add(1, Ordering::SeqCst);
            true
        });
    }

    fn report_read_failure(&self, message: String) {
        let _ = self.failures.send(PersistFailure {
            op: StorageOp::Read,
            key: self.key.clone(),
            revision: self.revision(),
            message,
        });
    }
}

/// Await a flush marker.
pub(crate) async fn wait_flushed(rx: oneshot::Receiver<()>) -> Result<()> {
    rx.await.map_err(|_| CartError::WriterStopped)
}

/// The cart scope.
///
/// Owns the authoritative in-memory cart and the single writer task that
/// persists it. Every mutation updates memory before returning and
/// schedules exactly one asynchronous write of the full cart; callers never
/// wait on storage.
pub struct CartStore<S: KvStore + 'static> {
    store: Arc<S>,
    shared: Arc<Shared>,
    writer: JoinHandle<()>,
    config: CartConfig,
}

impl<S: KvStore + 'static> CartStore<S> {
    /// Create an empty cart scope over `store` and start its writer.
    ///
    /// Nothing is read from storage; call [`CartStore::load`] next, or use
    /// [`CartStore::open`].
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(store: S, config: CartConfig) -> Self {
        let key = config.storage_key();
        let store = Arc::new(store);
        let (writes, rx) = mpsc::unbounded_channel();
        let (failures, _) = broadcast::channel(config.failure_buffer.max(1));
        let (state, _) = watch::channel(Cart::new());

        let writer = Writer::new(
            Arc::clone(&store),
            key.clone(),
            config.coalesce_writes,
            rx,
            failures.clone(),
        );
        let writer = tokio::spawn(writer.run());

        let shared = Arc::new(Shared {
            key,
            state,
            revision: AtomicU64::new(0),
            writes,
            failures,
        });

        Self {
            store,
            shared,
            writer,
            config,
        }
    }

    /// Create a cart scope and hydrate it from storage.
    pub async fn open(store: S, config: CartConfig) -> Self {
        let cart_store = Self::new(store, config);
        cart_store.load().await;
        cart_store
    }

    /// Read the stored snapshot and make it the current cart.
    ///
    /// Pending writes are flushed first so the read sees them. A restored
    /// snapshot replaces the in-memory cart wholesale. An absent or corrupted
    /// snapshot resets the cart to empty, even when earlier mutations never
    /// reached storage. A failed read leaves the in-memory cart untouched,
    /// since it says nothing about what is stored. Nothing is surfaced beyond
    /// the returned status, a log line, and, for read failures, the failure
    /// channel.
    pub async fn load(&self) -> SnapshotStatus {
        let key = &self.shared.key;

        match self.shared.flush_request() {
            Ok(rx) => {
                if wait_flushed(rx).await.is_err() {
                    warn!(key = %key, "cart writer stopped before load");
                }
            }
            Err(_) => warn!(key = %key, "cart writer stopped before load"),
        }

        let raw = match self.store.get(key).await {
            Ok(raw) => raw,
            Err(e) => {
                let message = e.to_string();
                warn!(key = %key, error = %message, "failed to read stored cart; starting from current state");
                self.shared.report_read_failure(message.clone());
                return SnapshotStatus::Unavailable(message);
            }
        };

        let (cart, status) = decode_or_empty(raw.as_deref());
        match &status {
            SnapshotStatus::Restored(items) => {
                info!(key = %key, items, "restored cart snapshot");
            }
            SnapshotStatus::Discarded(reason) => {
                warn!(key = %key, reason = %reason, "discarding malformed cart snapshot");
            }
            SnapshotStatus::Absent | SnapshotStatus::Unavailable(_) => {
                info!(key = %key, "no stored cart snapshot");
            }
        }
        // Empty for anything but a restored snapshot.
        self.shared.replace(cart);
        status
    }

    /// A new handle onto this scope.
    pub fn handle(&self) -> CartHandle {
        CartHandle::new(Arc::downgrade(&self.shared))
    }

    /// The key the cart snapshot is stored under.
    pub fn storage_key(&self) -> &str {
        &self.shared.key
    }

    pub fn config(&self) -> &CartConfig {
        &self.config
    }

    /// Number of state changes applied so far (mutations and loads).
    pub fn revision(&self) -> u64 {
        self.shared.revision()
    }

    /// Current cart contents.
    pub fn snapshot(&self) -> Cart {
        self.shared.snapshot()
    }

    /// Wait until every write issued so far has been attempted.
    pub async fn flush(&self) -> Result<()> {
        let rx = self.shared.flush_request()?;
        wait_flushed(rx).await
    }

    /// End the scope.
    ///
    /// Flushes outstanding writes, invalidates every handle, and waits for
    /// the writer to stop. Subscribers observe the sender closing.
    pub async fn close(self) -> Result<()> {
        let CartStore { shared, writer, .. } = self;
        let key = shared.key.clone();

        let flushed = match shared.flush_request() {
            Ok(rx) => wait_flushed(rx).await,
            Err(e) => Err(e),
        };
        drop(shared);

        writer.await.map_err(|_| CartError::WriterStopped)?;
        info!(key = %key, "closed cart scope");
        flushed
    }
}

impl CartStore<SqliteStore> {
    /// Open (or create) a SQLite-backed cart at `path` and hydrate it.
    pub async fn open_sqlite(path: impl AsRef<Path>, config: CartConfig) -> Result<Self> {
        let store = SqliteStore::open(path)?;
        Ok(Self::open(store, config).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketcart_core::Product;
    use marketcart_store::MemoryStore;

    fn product(id: &str, price: f64) -> Product {
        Product::new(id, format!("Product {id}"), format!("https://img/{id}.png"), price)
    }

    #[tokio::test]
    async fn test_open_empty_store() {
        let cart_store = CartStore::open(MemoryStore::new(), CartConfig::default()).await;
        assert!(cart_store.snapshot().is_empty());
        assert_eq!(cart_store.revision(), 0);
    }

    #[tokio::test]
    async fn test_mutations_are_visible_immediately() {
        let cart_store = CartStore::new(MemoryStore::new(), CartConfig::default());
        let handle = cart_store.handle();

        handle.add_to_cart(product("a", 10.0)).unwrap();
        handle.increment(&"a".into()).unwrap();

        assert_eq!(cart_store.snapshot().get(&"a".into()).unwrap().quantity, 2);
        assert_eq!(cart_store.revision(), 2);
    }

    #[tokio::test]
    async fn test_not_found_does_not_bump_revision() {
        let cart_store = CartStore::new(MemoryStore::new(), CartConfig::default());
        let handle = cart_store.handle();

        assert_eq!(handle.increment(&"ghost".into()).unwrap(), Mutation::NotFound);
        assert_eq!(cart_store.revision(), 0);
    }

    #[tokio::test]
    async fn test_load_restores_snapshot() {
        let raw = r#"[{"id":"a","title":"A","image_url":"u","price":2.0,"quantity":3}]"#;
        let store = MemoryStore::with_entry("@GoMarketPlace:products", raw);

        let cart_store = CartStore::new(store, CartConfig::default());
        let status = cart_store.load().await;

        assert_eq!(status, SnapshotStatus::Restored(1));
        assert_eq!(cart_store.snapshot().totals().item_count, 3);
    }

    #[tokio::test]
    async fn test_load_corrupted_snapshot_starts_empty() {
        let store = MemoryStore::with_entry("@GoMarketPlace:products", "{oops");

        let cart_store = CartStore::new(store, CartConfig::default());
        let status = cart_store.load().await;

        assert!(matches!(status, SnapshotStatus::Discarded(_)));
        assert!(cart_store.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_close_invalidates_handles() {
        let cart_store = CartStore::new(MemoryStore::new(), CartConfig::default());
        let handle = cart_store.handle();
        assert!(handle.is_in_scope());

        cart_store.close().await.unwrap();

        assert!(!handle.is_in_scope());
        assert!(matches!(
            handle.add_to_cart(product("a", 1.0)),
            Err(CartError::OutOfScope)
        ));
    }

    #[tokio::test]
    async fn test_open_sqlite_uses_custom_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.db");
        let config = CartConfig::default().with_namespace("@Kiosk");

        let cart_store = CartStore::<SqliteStore>::open_sqlite(&path, config).await.unwrap();
        assert_eq!(cart_store.storage_key(), "@Kiosk:products");

        cart_store.handle().add_to_cart(product("a", 1.0)).unwrap();
        cart_store.close().await.unwrap();

        let raw = SqliteStore::open(&path).unwrap().get("@Kiosk:products").await.unwrap();
        assert!(raw.unwrap().contains("\"id\":\"a\""));
    }
}
