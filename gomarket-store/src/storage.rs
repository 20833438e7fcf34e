//! Key-value storage backends.
//!
//! - [`MemoryStorage`] keeps everything in process; used for tests and
//!   ephemeral sessions.
//! - [`FileStorage`] keeps a single JSON object of `key -> value` on disk,
//!   rewritten atomically on every change.

use async_trait::async_trait;
use gomarket_core::{CoreError, KeyValueStorage};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::StoreError;
use crate::persistence::{load_json_opt, save_json};

// ============================================================================
// Memory Storage
// ============================================================================

/// In-memory key-value storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), value.into());
        Self {
            entries: RwLock::new(entries),
        }
    }
}

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ============================================================================
// File Storage
// ============================================================================

/// Key-value storage backed by one JSON file.
///
/// Every operation reads the file, so external edits are picked up; writes
/// are serialized through a lock and land via temp file + rename.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    /// Creates storage backed by `path`. The file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(load_json_opt(&self.path).await?.unwrap_or_default())
    }

    async fn modify<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await?;
        f(&mut entries);
        save_json(&self.path, &entries).await
    }
}

fn storage_error(err: StoreError) -> CoreError {
    CoreError::Storage(err.to_string())
}

#[async_trait]
impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, CoreError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_entries().await.map_err(storage_error)?;
        debug!(path = %self.path.display(), key, "Storage read");
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CoreError> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value);
        })
        .await
        .map_err(storage_error)?;
        debug!(path = %self.path.display(), key, "Storage write");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CoreError> {
        self.modify(|entries| {
            entries.remove(key);
        })
        .await
        .map_err(storage_error)?;
        debug!(path = %self.path.display(), key, "Storage remove");
        Ok(())
    }
}
