//! Background persistence writer.
//!
//! Cart mutations publish in memory first and hand the new snapshot to this
//! writer. A single task drains the queue, so snapshots reach storage in the
//! order the mutations happened.

use chrono::{DateTime, Utc};
use gomarket_core::{Cart, KeyValueStorage};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc, oneshot};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Outcome of persistence writes so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersistStatus {
    /// Snapshots successfully written.
    pub writes: u64,
    /// Snapshots dropped because a newer one was already queued.
    pub coalesced: u64,
    /// Writes the storage backend rejected.
    pub failures: u64,
    /// Time of the last successful write.
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Message of the most recent failure, cleared by the next success.
    pub last_error: Option<String>,
}

enum WriteRequest {
    Save(Arc<Cart>),
    Flush(oneshot::Sender<()>),
}

/// Handle to the writer task. The task exits once every handle is dropped.
pub(crate) struct PersistWriter {
    tx: mpsc::UnboundedSender<WriteRequest>,
    status: Arc<RwLock<PersistStatus>>,
}

impl PersistWriter {
    /// Spawns the writer task on the current Tokio runtime.
    pub(crate) fn spawn(storage: Arc<dyn KeyValueStorage>, key: String, coalesce: bool) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let status = Arc::new(RwLock::new(PersistStatus::default()));
        tokio::spawn(run(storage, key, coalesce, rx, Arc::clone(&status)));
        Self { tx, status }
    }

    /// Queues a snapshot without waiting for it to be written.
    pub(crate) fn enqueue(&self, cart: Arc<Cart>) -> Result<(), StoreError> {
        self.tx
            .send(WriteRequest::Save(cart))
            .map_err(|_| StoreError::WriterClosed)
    }

    /// Waits until every snapshot queued before this call has been handled.
    pub(crate) async fn flush(&self) -> Result<(), StoreError> {
        let (ack, done) = oneshot::channel();
        self.tx
            .send(WriteRequest::Flush(ack))
            .map_err(|_| StoreError::WriterClosed)?;
        done.await.map_err(|_| StoreError::WriterClosed)
    }

    pub(crate) async fn status(&self) -> PersistStatus {
        self.status.read().await.clone()
    }
}

async fn run(
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    coalesce: bool,
    mut rx: mpsc::UnboundedReceiver<WriteRequest>,
    status: Arc<RwLock<PersistStatus>>,
) {
    while let Some(request) = rx.recv().await {
        match request {
            WriteRequest::Save(mut cart) => {
                let mut acks = Vec::new();
                let mut skipped = 0;
                if coalesce {
                    while let Ok(next) = rx.try_recv() {
                        match next {
                            WriteRequest::Save(newer) => {
                                cart = newer;
                                skipped += 1;
                            }
                            WriteRequest::Flush(ack) => acks.push(ack),
                        }
                    }
                }

                write_snapshot(storage.as_ref(), &key, &cart, &status, skipped).await;

                for ack in acks {
                    let _ = ack.send(());
                }
            }
            WriteRequest::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!(key = %key, "Persistence writer stopped");
}

async fn write_snapshot(
    storage: &dyn KeyValueStorage,
    key: &str,
    cart: &Cart,
    status: &RwLock<PersistStatus>,
    skipped: u64,
) {
    let result = match cart.to_json() {
        Ok(json) => storage.set(key, json).await,
        Err(e) => Err(e),
    };

    let mut status = status.write().await;
    status.coalesced += skipped;
    match result {
        Ok(()) => {
            status.writes += 1;
            status.last_saved_at = Some(Utc::now());
            status.last_error = None;
            debug!(key, items = cart.len(), skipped, "Cart snapshot persisted");
        }
        Err(e) => {
            status.failures += 1;
            status.last_error = Some(e.to_string());
            warn!(key, error = %e, "Failed to persist cart snapshot");
        }
    }
}
