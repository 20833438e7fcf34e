//! Core error types for `GoMarketplace`.

use thiserror::Error;

/// Core error type for cart operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A product was supplied without an id.
    #[error("Product id must not be empty")]
    MissingId,

    /// Cart data violates an invariant (duplicate id, zero quantity, ...).
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The storage backend rejected a read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
