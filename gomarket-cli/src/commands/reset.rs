//! Reset command - remove the persisted cart.

use anyhow::Result;
use gomarket_core::KeyValueStorage;
use gomarket_store::FileStorage;
use tracing::info;

use super::load_config;
use crate::Cli;

/// Runs the reset command.
///
/// Only the cart key is removed; other keys in the storage file stay.
pub async fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let storage = FileStorage::new(config.storage_path());
    let key = config.storage_key();

    if storage.get(&key).await?.is_none() {
        println!("No saved cart to reset");
        return Ok(());
    }

    storage.remove(&key).await?;
    info!(key = %key, path = %storage.path().display(), "Cart reset");
    println!("Cart reset");
    Ok(())
}
