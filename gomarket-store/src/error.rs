//! Store error types.

use gomarket_core::CoreError;
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The cart was accessed outside an active provider scope.
    ///
    /// This is a programming error in the caller, not a data error.
    #[error("use_cart must be used within a CartProvider")]
    OutsideProvider,

    /// `initialize` was called on a store that already loaded.
    #[error("Cart store is already initialized")]
    AlreadyInitialized,

    /// The persisted cart could not be decoded.
    #[error("Persisted cart is corrupt: {0}")]
    CorruptCart(String),

    /// Cart rule or storage backend failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The background persistence writer is gone.
    #[error("Persistence writer has shut down")]
    WriterClosed,

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl StoreError {
    /// Returns true if this error signals misuse of the store API rather
    /// than a failure of data or I/O.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            StoreError::OutsideProvider | StoreError::AlreadyInitialized
        )
    }
}
