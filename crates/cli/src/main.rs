//! Cartwheel CLI - Document store seeding and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Push the bundled catalog into the document store (skips existing names)
//! cw-cli seed products
//!
//! # Create sample orders for a user
//! cw-cli seed orders -u <user-id>
//! ```
//!
//! # Commands
//!
//! - `seed products` - Seed the `products` collection from the bundled catalog
//! - `seed orders` - Create sample orders for testing the order history

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cw-cli")]
#[command(author, version, about = "Cartwheel CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the remote document store
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed the products collection from the bundled catalog
    Products,
    /// Create sample orders for a user
    Orders {
        /// User id to create the orders for
        #[arg(short, long)]
        user_id: String,
    },
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
        Commands::Seed { target } => match target {
            SeedTarget::Products => commands::seed::products().await?,
            SeedTarget::Orders { user_id } => commands::seed::orders(&user_id).await?,
        },
    }
    Ok(())
}
