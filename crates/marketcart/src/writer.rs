//! The persistence writer: a single task that owns all writes to storage.
//!
//! Mutations enqueue the post-update cart while still holding the state
//! lock, so the queue order is the mutation order. The writer drains the
//! queue one job at a time; a write can therefore never overtake a newer
//! one and overwrite newer state with older state.

use std::fmt;
use std::sync::Arc;

use marketcart_core::{encode, Cart};
use marketcart_store::KvStore;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, warn};

/// Which storage call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Read,
    Write,
}

impl fmt::Display for StorageOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageOp::Read => f.write_str("read"),
            StorageOp::Write => f.write_str("write"),
        }
    }
}

/// A storage failure observed by the cart.
///
/// The in-memory cart is never rolled back; this is purely informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    pub op: StorageOp,
    pub key: String,
    /// Cart revision the failed call was carrying (or observing, for reads).
    pub revision: u64,
    pub message: String,
}

/// A full cart snapshot to write.
#[derive(Debug)]
pub(crate) struct PersistJob {
    pub revision: u64,
    pub cart: Cart,
}

#[derive(Debug)]
pub(crate) enum WriterCommand {
    Persist(PersistJob),
    /// Acknowledge once every command queued before this one is done.
    Flush(oneshot::Sender<()>),
}

pub(crate) struct Writer<S: KvStore> {
    store: Arc<S>,
    key: String,
    coalesce: bool,
    rx: mpsc::UnboundedReceiver<WriterCommand>,
    failures: broadcast::Sender<PersistFailure>,
}

impl<S: KvStore + 'static> Writer<S> {
    pub fn new(
        store: Arc<S>,
        key: String,
        coalesce: bool,
        rx: mpsc::UnboundedReceiver<WriterCommand>,
        failures: broadcast::Sender<PersistFailure>,
    ) -> Self {
        Self {
            store,
            key,
            coalesce,
            rx,
            failures,
        }
    }

    /// Run until every sender is gone and the queue is drained.
    pub async fn run(mut self) {
        while let Some(command) = self.rx.recv().await {
            match command {
                WriterCommand::Persist(job) => {
                    let (job, waiters) = if self.coalesce {
                        self.take_newest(job)
                    } else {
                        (job, Vec::new())
                    };
                    self.persist(job).await;
                    for waiter in waiters {
                        let _ = waiter.send(());
                    }
                }
                WriterCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!(key = %self.key, "cart writer stopped");
    }

    /// Collapse everything already queued into the newest snapshot.
    ///
    /// Flush requests met on the way are answered after that snapshot lands.
    fn take_newest(&mut self, mut job: PersistJob) -> (PersistJob, Vec<oneshot::Sender<()>>) {
        let mut waiters = Vec::new();
        let mut skipped = 0usize;

        while let Ok(command) = self.rx.try_recv() {
            match command {
                WriterCommand::Persist(newer) => {
                    job = newer;
                    skipped += 1;
                }
                WriterCommand::Flush(done) => waiters.push(done),
            }
        }

        if skipped > 0 {
            debug!(key = %self.key, revision = job.revision, skipped, "coalesced cart writes");
        }
        (job, waiters)
    }

    async fn persist(&self, job: PersistJob) {
        let raw = match encode(&job.cart) {
            Ok(raw) => raw,
            Err(e) => {
                self.report(job.revision, e.to_string());
                return;
            }
        };

        match self.store.set(&self.key, &raw).await {
            Ok(()) => {
                debug!(key = %self.key, revision = job.revision, items = job.cart.len(), "persisted cart");
            }
            Err(e) => self.report(job.revision, e.to_string()),
        }
    }

    fn report(&self, revision: u64, message: String) {
        warn!(key = %self.key, revision, error = %message, "failed to persist cart; keeping in-memory state");
        // No subscribers is fine.
        let _ = self.failures.send(PersistFailure {
            op: StorageOp::Write,
            key: self.key.clone(),
            revision,
            message,
        });
    }
}
