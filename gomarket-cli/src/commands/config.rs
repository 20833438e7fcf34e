//! Config command - inspect configuration.

use anyhow::Result;
use clap::{Args, Subcommand};
use gomarket_store::default_config_dir;

use super::{config_path, load_config};
use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration.
    Show,

    /// Show configuration and storage paths.
    Path,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;

    match cli.format {
        OutputFormat::Text => {
            println!("GoMarketplace Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Namespace:        {}", config.namespace);
            println!("Storage key:      {}", config.storage_key());
            println!("Storage file:     {}", config.storage_path().display());
            println!("On corrupt data:  {}", config.corrupt_data);
            println!("Coalesce writes:  {}", config.coalesce_writes);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli) -> Result<()> {
    let config = load_config(cli).await?;
    let config_dir = default_config_dir();
    let config_file = config_path(cli);
    let storage_file = config.storage_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Config file:   {}", config_file.display());
            println!("Storage file:  {}", storage_file.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_file.display().to_string(),
                "storage_file": storage_file.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}
