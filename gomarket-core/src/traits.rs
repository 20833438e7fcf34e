//! Trait definitions for the cart.
//!
//! The cart never talks to a concrete storage engine. It persists through
//! [`KeyValueStorage`], an asynchronous string key-value store in the shape
//! of device-local storage on mobile platforms.

use async_trait::async_trait;

use crate::error::CoreError;

/// Asynchronous key-value storage backend.
///
/// Implementors are responsible for:
/// - Returning `None` for keys that were never written (or were removed)
/// - Overwriting any previous value on `set`
/// - Serializing their own concurrent writes
///
/// The cart itself only ever calls `get` and `set`.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Reads the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), CoreError>;

    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<(), CoreError>;
}
