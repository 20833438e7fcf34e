//! Main cart state store.
//!
//! Holds the authoritative cart, publishes every change to subscribers, and
//! mirrors each change to key-value storage through the persistence writer.

use gomarket_core::{Cart, CoreError, KeyValueStorage, ProductInput};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::config::{CartConfig, CorruptDataPolicy};
use crate::error::StoreError;
use crate::writer::{PersistStatus, PersistWriter};

// ============================================================================
// Phase
// ============================================================================

/// Load state of a [`CartStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorePhase {
    /// The persisted cart has not been read yet.
    Loading,
    /// The initial load settled. Terminal.
    Ready,
}

impl fmt::Display for StorePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
        }
    }
}

// ============================================================================
// Inner State
// ============================================================================

struct CartStoreInner {
    /// Current cart. Swapped wholesale on every mutation.
    products: Arc<Cart>,
    phase: StorePhase,
    /// Set once `initialize` starts, so a concurrent second call is refused.
    init_started: bool,
    /// Change counter sent to subscribers.
    version: u64,
}

// ============================================================================
// Cart Store
// ============================================================================

/// The cart store.
///
/// Cheap to clone; clones share state, subscribers, and the writer task.
/// Observable via a watch channel carrying a change counter.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<RwLock<CartStoreInner>>,
    notify: Arc<watch::Sender<u64>>,
    storage: Arc<dyn KeyValueStorage>,
    key: Arc<str>,
    corrupt_data: CorruptDataPolicy,
    writer: Arc<PersistWriter>,
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("key", &self.key)
            .field("corrupt_data", &self.corrupt_data)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Creates a store in the `Loading` phase with an empty cart.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime; the persistence writer
    /// task is spawned here.
    pub fn new(storage: Arc<dyn KeyValueStorage>, config: &CartConfig) -> Self {
        let key = config.storage_key();
        let writer = PersistWriter::spawn(Arc::clone(&storage), key.clone(), config.coalesce_writes);
        let (notify, _) = watch::channel(0);

        Self {
            inner: Arc::new(RwLock::new(CartStoreInner {
                products: Arc::new(Cart::new()),
                phase: StorePhase::Loading,
                init_started: false,
                version: 0,
            })),
            notify: Arc::new(notify),
            storage,
            key: key.into(),
            corrupt_data: config.corrupt_data,
            writer: Arc::new(writer),
        }
    }

    /// Creates a store and runs [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns whatever `initialize` returns.
    pub async fn open(
        storage: Arc<dyn KeyValueStorage>,
        config: &CartConfig,
    ) -> Result<Self, StoreError> {
        let store = Self::new(storage, config);
        store.initialize().await?;
        Ok(store)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Loads the persisted cart and moves the store to `Ready`.
    ///
    /// A missing snapshot leaves the current cart as is. A present snapshot
    /// replaces it, discarding anything mutated while loading. The phase
    /// becomes `Ready` whether or not the load succeeded.
    ///
    /// # Errors
    ///
    /// - `StoreError::AlreadyInitialized` on a second call
    /// - `StoreError::Core` if the storage read fails
    /// - `StoreError::CorruptCart` if the snapshot cannot be decoded and the
    ///   policy is [`CorruptDataPolicy::Fail`]
    pub async fn initialize(&self) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.write().await;
            if inner.init_started {
                return Err(StoreError::AlreadyInitialized);
            }
            inner.init_started = true;
        }

        let loaded = self.load_snapshot().await;

        let mut inner = self.inner.write().await;
        inner.phase = StorePhase::Ready;
        let result = match loaded {
            Ok(Some(cart)) => {
                info!(key = %self.key, items = cart.len(), "Loaded persisted cart");
                inner.products = Arc::new(cart);
                Ok(())
            }
            Ok(None) => {
                debug!(key = %self.key, "No persisted cart, keeping current state");
                Ok(())
            }
            Err(e) => Err(e),
        };
        self.notify_change(&mut inner);
        result
    }

    async fn load_snapshot(&self) -> Result<Option<Cart>, StoreError> {
        let Some(raw) = self.storage.get(&self.key).await? else {
            return Ok(None);
        };

        match Cart::from_json(&raw) {
            Ok(cart) => Ok(Some(cart)),
            Err(e) => match self.corrupt_data {
                CorruptDataPolicy::Fail => Err(StoreError::CorruptCart(e.to_string())),
                CorruptDataPolicy::Reset => {
                    warn!(key = %self.key, error = %e, "Persisted cart is corrupt, starting empty");
                    Ok(None)
                }
            },
        }
    }

    /// Returns the current load phase.
    pub async fn phase(&self) -> StorePhase {
        self.inner.read().await.phase
    }

    /// Returns true once the initial load has settled.
    pub async fn is_ready(&self) -> bool {
        self.phase().await == StorePhase::Ready
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Returns the current cart.
    pub async fn products(&self) -> Arc<Cart> {
        Arc::clone(&self.inner.read().await.products)
    }

    /// Returns the storage key the cart is persisted under.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Adds one unit of `item`.
    ///
    /// An existing line with the same id is bumped in place; a new id is
    /// appended with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MissingId` (wrapped) for an empty id, or
    /// `StoreError::WriterClosed` if the writer task is gone.
    pub async fn add_to_cart(&self, item: ProductInput) -> Result<Arc<Cart>, StoreError> {
        self.apply("add_to_cart", |cart| cart.with_added(item)).await
    }

    /// Raises the quantity of `id` by one. Unknown ids change nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriterClosed` if the writer task is gone.
    pub async fn increment(&self, id: &str) -> Result<Arc<Cart>, StoreError> {
        self.apply("increment", |cart| Ok(cart.with_incremented(id)))
            .await
    }

    /// Lowers the quantity of `id` by one, never below 1. Unknown ids change
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriterClosed` if the writer task is gone.
    pub async fn decrement(&self, id: &str) -> Result<Arc<Cart>, StoreError> {
        self.apply("decrement", |cart| Ok(cart.with_decremented(id)))
            .await
    }

    /// Replaces the cart with `f(current)`, notifies subscribers, and queues
    /// the new snapshot for persistence, all under one lock so snapshots are
    /// queued in mutation order.
    async fn apply<F>(&self, op: &'static str, f: F) -> Result<Arc<Cart>, StoreError>
    where
        F: FnOnce(&Cart) -> Result<Cart, CoreError>,
    {
        let mut inner = self.inner.write().await;
        if inner.phase == StorePhase::Loading {
            warn!(op, "Cart mutated before initialization settled");
        }

        let next = Arc::new(f(inner.products.as_ref())?);
        inner.products = Arc::clone(&next);
        self.notify_change(&mut inner);
        debug!(op, items = next.len(), version = inner.version, "Cart updated");

        self.writer.enqueue(Arc::clone(&next))?;
        Ok(next)
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Waits until every mutation made before this call has been written (or
    /// has failed to write).
    ///
    /// # Errors
    ///
    /// Returns `StoreError::WriterClosed` if the writer task is gone.
    pub async fn flush(&self) -> Result<(), StoreError> {
        self.writer.flush().await
    }

    /// Returns counters and the last outcome of persistence writes.
    pub async fn persist_status(&self) -> PersistStatus {
        self.writer.status().await
    }

    // ========================================================================
    // Observable
    // ========================================================================

    /// Subscribes to store changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    fn notify_change(&self, inner: &mut CartStoreInner) {
        inner.version += 1;
        // `send` drops the value when nobody is subscribed yet.
        self.notify.send_replace(inner.version);
    }
}

// ============================================================================
// Tests
// ============================================================================
