//! On-disk JSON documents.
//!
//! Config and file-backed storage both go through here: owner-only
//! permissions, atomic replace, and a "missing means absent" read.

use serde::{Serialize, de::DeserializeOwned};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::StoreError;

const APP_DIR: &str = "gomarket";
const FILE_MODE: u32 = 0o600;
const DIR_MODE: u32 = 0o700;

// ============================================================================
// Default Paths
// ============================================================================

/// Directory holding `config.json` (`~/.config/gomarket` on Linux).
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir().map_or_else(|| PathBuf::from("."), |dir| dir.join(APP_DIR))
}

/// Directory holding the cart storage file (`~/.local/share/gomarket` on
/// Linux).
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(default_config_dir, |dir| dir.join(APP_DIR))
}

/// `config.json` in the config directory.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

/// `storage.json` in the data directory.
pub fn default_storage_path() -> PathBuf {
    default_data_dir().join("storage.json")
}

// ============================================================================
// Permissions
// ============================================================================

#[cfg(unix)]
async fn restrict(path: &Path, mode: u32) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).await?;
    debug!(path = %path.display(), mode = %format!("{mode:o}"), "Restricted permissions");
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path, _mode: u32) -> Result<(), StoreError> {
    Ok(())
}

// ============================================================================
// Reading and Writing
// ============================================================================

/// Creates `dir` (and its parents) if missing. Only a directory created here
/// gets its permissions tightened; existing ones are left alone.
///
/// # Errors
///
/// Returns `StoreError::Io` if the directory cannot be created.
pub async fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.as_os_str().is_empty() || dir.is_dir() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir).await?;
    restrict(dir, DIR_MODE).await
}

/// Writes `data` as pretty JSON, replacing `path` atomically.
///
/// The document goes to `<path>.tmp` first and is renamed over the target,
/// so readers never see a half-written file.
///
/// # Errors
///
/// Returns an error if serialization or any filesystem step fails.
pub async fn save_json<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }

    let json = serde_json::to_vec_pretty(data)?;
    let staging = path.with_extension("json.tmp");
    tokio::fs::write(&staging, &json).await?;
    restrict(&staging, FILE_MODE).await?;
    tokio::fs::rename(&staging, path).await?;

    debug!(path = %path.display(), bytes = json.len(), "Saved JSON document");
    Ok(())
}

/// Reads and decodes a JSON document.
///
/// # Errors
///
/// Returns `StoreError::Io` if the file cannot be read and
/// `StoreError::Serialization` if it does not decode as `T`.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let bytes = tokio::fs::read(path).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Like [`load_json`], but a file that does not exist yields `None`.
///
/// # Errors
///
/// Any other read failure or a decode failure.
pub async fn load_json_opt<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No document on disk");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}
