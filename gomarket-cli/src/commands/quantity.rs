//! Increment/decrement commands - adjust a line item's quantity.

use anyhow::Result;
use clap::Args;
use gomarket_store::{CartStore, StoreError, use_cart};
use tracing::{info, warn};

use super::{mount_cart, print_cart};
use crate::Cli;

/// Arguments for the increment and decrement commands.
#[derive(Args)]
pub struct QuantityArgs {
    /// Id of the line item to adjust.
    pub id: String,
}

#[derive(Clone, Copy)]
enum Direction {
    Up,
    Down,
}

/// Runs the increment command.
pub async fn increment(args: &QuantityArgs, cli: &Cli) -> Result<()> {
    adjust(args, cli, Direction::Up).await
}

/// Runs the decrement command.
pub async fn decrement(args: &QuantityArgs, cli: &Cli) -> Result<()> {
    adjust(args, cli, Direction::Down).await
}

async fn adjust(args: &QuantityArgs, cli: &Cli, direction: Direction) -> Result<()> {
    let provider = mount_cart(cli).await?;

    let cart = provider
        .scope(async {
            let cart = use_cart()?;
            let updated = match direction {
                Direction::Up => cart.increment(&args.id).await?,
                Direction::Down => cart.decrement(&args.id).await?,
            };
            cart.flush().await?;
            Ok::<_, StoreError>(updated)
        })
        .await?;
    ensure_persisted(provider.store()).await?;

    match cart.get(&args.id) {
        Some(item) => info!(id = %args.id, quantity = item.quantity, "Quantity updated"),
        None => warn!(id = %args.id, "No line item with this id, cart unchanged"),
    }
    print_cart(&cart, cli)
}

/// Fails if the most recent persistence write was rejected.
pub async fn ensure_persisted(store: &CartStore) -> Result<()> {
    if let Some(error) = store.persist_status().await.last_error {
        anyhow::bail!("cart was updated but could not be saved: {error}");
    }
    Ok(())
}
