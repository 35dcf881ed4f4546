//! Cedar CLI - Manual syncs and database migrations.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! cedar-cli migrate
//!
//! # Run one sync pass
//! cedar-cli sync --integration 3
//!
//! # Run every integration flagged for automatic sync
//! cedar-cli sync-all
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `sync` - Run one sync pass for a single integration
//! - `sync-all` - Run a batch pass over all auto-sync integrations

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cedar-cli")]
#[command(author, version, about = "Cedar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Run one sync pass for a single integration
    Sync {
        /// Integration ID to sync
        #[arg(short, long)]
        integration: i32,
    },
    /// Run a batch pass over all auto-sync integrations
    SyncAll,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Sync { integration } => commands::sync::run_one(integration).await?,
        Commands::SyncAll => commands::sync::run_all().await?,
    }
    Ok(())
}
