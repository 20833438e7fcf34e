//! CLI command implementations.

pub mod add;
pub mod config;
pub mod list;
pub mod quantity;
pub mod reset;

use anyhow::{Context, Result};
use gomarket_core::Cart;
use gomarket_store::{CartConfig, CartProvider, FileStorage, default_config_path};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use crate::output::{CartOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Returns the config file path the CLI reads.
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(default_config_path)
}

/// Loads the configuration, applying command-line overrides.
pub async fn load_config(cli: &Cli) -> Result<CartConfig> {
    let path = config_path(cli);
    let mut config = CartConfig::load_from(&path)
        .await
        .with_context(|| format!("failed to load config from {}", path.display()))?;

    if let Some(storage) = &cli.storage {
        config.storage_path = Some(storage.clone());
    }
    Ok(config)
}

/// Mounts the cart against file-backed storage.
pub async fn mount_cart(cli: &Cli) -> Result<CartProvider> {
    let config = load_config(cli).await?;
    let storage_path = config.storage_path();
    debug!(path = %storage_path.display(), key = %config.storage_key(), "Mounting cart");

    let storage = Arc::new(FileStorage::new(storage_path));
    Ok(CartProvider::mount(storage, &config).await?)
}

/// Prints a cart in the selected output format.
pub fn print_cart(cart: &Cart, cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_cart(cart));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&CartOutput::from(cart))?);
        }
    }
    Ok(())
}
