// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `GoMarketplace` CLI - inspect and edit the persisted shopping cart.
//!
//! # Examples
//!
//! ```bash
//! # Show the cart
//! gomarket
//!
//! # Add a product (or bump its quantity if already present)
//! gomarket add --id p1 --title Shirt --image-url https://img/p1.png --price 10
//!
//! # Adjust quantities
//! gomarket increment p1
//! gomarket decrement p1
//!
//! # JSON output
//! gomarket --format json --pretty
//!
//! # Use a different storage file
//! gomarket --storage /tmp/cart.json list
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use gomarket_store::StoreError;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{add, config, list, quantity, reset};

// ============================================================================
// CLI Definition
// ============================================================================

/// `GoMarketplace` CLI - persistent shopping cart.
#[derive(Parser)]
#[command(name = "gomarket")]
#[command(about = "Inspect and edit the GoMarketplace shopping cart")]
#[command(version)]
pub struct Cli {
    /// Subcommand to run. If none, runs 'list' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Storage file to use instead of the configured one.
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    /// Config file to use instead of the default one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (no logging, errors only via exit code).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the cart (default if no command specified).
    #[command(visible_alias = "ls")]
    List,

    /// Add one unit of a product.
    #[command(visible_alias = "a")]
    Add(add::AddArgs),

    /// Raise a line item's quantity by one.
    #[command(visible_alias = "inc")]
    Increment(quantity::QuantityArgs),

    /// Lower a line item's quantity by one (never below 1).
    #[command(visible_alias = "dec")]
    Decrement(quantity::QuantityArgs),

    /// Remove the persisted cart.
    Reset,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// The persisted cart could not be decoded.
    CorruptData = 2,
}

impl ExitCode {
    fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<StoreError>() {
            Some(StoreError::CorruptCart(_)) => Self::CorruptData,
            _ => Self::Error,
        }
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("gomarket=debug,info")
    } else {
        EnvFilter::new("gomarket=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::List) | None => list::run(&cli).await,
        Some(Commands::Add(args)) => add::run(args, &cli).await,
        Some(Commands::Increment(args)) => quantity::increment(args, &cli).await,
        Some(Commands::Decrement(args)) => quantity::decrement(args, &cli).await,
        Some(Commands::Reset) => reset::run(&cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}
