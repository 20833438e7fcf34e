//! List command - show the current cart.

use anyhow::Result;

use super::{mount_cart, print_cart};
use crate::Cli;

/// Runs the list command.
pub async fn run(cli: &Cli) -> Result<()> {
    let provider = mount_cart(cli).await?;
    let cart = provider.store().products().await;
    print_cart(&cart, cli)
}
