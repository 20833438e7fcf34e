//! Configuration management.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, default_storage_path, load_json_opt, save_json};

/// Namespace the cart key lives under unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "@GoMarketplace";

/// What to do when the persisted cart cannot be decoded on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptDataPolicy {
    /// Surface the error to whoever mounted the cart.
    #[default]
    Fail,
    /// Log a warning and start from an empty cart.
    Reset,
}

impl fmt::Display for CorruptDataPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Reset => write!(f, "reset"),
        }
    }
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CartConfig {
    /// Prefix of the storage key (`{namespace}:products`).
    pub namespace: String,
    /// Key-value storage file. Falls back to the platform data directory.
    pub storage_path: Option<PathBuf>,
    /// Handling of undecodable persisted data.
    pub corrupt_data: CorruptDataPolicy,
    /// Collapse queued persistence writes into the most recent snapshot.
    pub coalesce_writes: bool,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            storage_path: None,
            corrupt_data: CorruptDataPolicy::default(),
            coalesce_writes: false,
        }
    }
}

impl CartConfig {
    /// Returns the storage key the cart snapshot is written under.
    pub fn storage_key(&self) -> String {
        format!("{}:products", self.namespace)
    }

    /// Returns the effective storage file path.
    pub fn storage_path(&self) -> PathBuf {
        self.storage_path.clone().unwrap_or_else(default_storage_path)
    }

    /// Checks the configuration for values the store cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Config` if the namespace is blank.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.namespace.trim().is_empty() {
            return Err(StoreError::Config("namespace must not be empty".to_string()));
        }
        Ok(())
    }

    /// Loads configuration from the default path, or defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns error if an existing config file cannot be read or parsed.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load_from(&default_config_path()).await
    }

    /// Loads configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if an existing config file cannot be read or parsed,
    /// or if it fails validation.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let Some(config) = load_json_opt::<Self>(path).await? else {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        };
        config.validate()?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_key() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key(), "@GoMarketplace:products");
    }

    #[test]
    fn test_custom_namespace_key() {
        let config = CartConfig {
            namespace: "@Staging".to_string(),
            ..Default::default()
        };
        assert_eq!(config.storage_key(), "@Staging:products");
    }

    #[test]
    fn test_blank_namespace_rejected() {
        let config = CartConfig {
            namespace: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CartConfig = serde_json::from_str(r#"{"corrupt_data":"reset"}"#).unwrap();
        assert_eq!(config.corrupt_data, CorruptDataPolicy::Reset);
        assert_eq!(config.namespace, DEFAULT_NAMESPACE);
        assert!(!config.coalesce_writes);
    }

    #[test]
    fn test_explicit_storage_path_wins() {
        let config = CartConfig {
            storage_path: Some(PathBuf::from("/tmp/cart.json")),
            ..Default::default()
        };
        assert_eq!(config.storage_path(), PathBuf::from("/tmp/cart.json"));
    }

    #[tokio::test]
    async fn test_load_missing_file_returns_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = CartConfig::load_from(&temp_dir.path().join("config.json"))
            .await
            .unwrap();
        assert_eq!(config, CartConfig::default());
    }
}
