//! Add command - put one unit of a product in the cart.

use anyhow::Result;
use clap::Args;
use gomarket_core::ProductInput;
use gomarket_store::{StoreError, use_cart};
use tracing::info;

use super::{mount_cart, print_cart, quantity::ensure_persisted};
use crate::Cli;

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id. Adding an id already in the cart bumps its quantity.
    #[arg(long)]
    pub id: String,

    /// Product title.
    #[arg(long)]
    pub title: String,

    /// Product image URL. Empty if omitted.
    #[arg(long, default_value = "")]
    pub image_url: String,

    /// Unit price.
    #[arg(long)]
    pub price: f64,
}

impl AddArgs {
    fn to_input(&self) -> ProductInput {
        ProductInput::new(&self.id, &self.title, &self.image_url, self.price)
    }
}

/// Runs the add command.
pub async fn run(args: &AddArgs, cli: &Cli) -> Result<()> {
    let provider = mount_cart(cli).await?;

    let cart = provider
        .scope(async {
            let cart = use_cart()?;
            let updated = cart.add_to_cart(args.to_input()).await?;
            cart.flush().await?;
            Ok::<_, StoreError>(updated)
        })
        .await?;
    ensure_persisted(provider.store()).await?;

    info!(id = %args.id, "Product added");
    print_cart(&cart, cli)
}
