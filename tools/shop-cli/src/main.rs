//! Shop CLI - storefront and back-office client for the product and order services.
//!
//! Commands:
//! - `shop products` - List, inspect, edit and delete catalog products
//! - `shop orders` - List orders, change their status, delete them
//! - `shop checkout` - Build a cart from the live catalog and place an order
//! - `shop config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CheckoutArgs, ConfigArgs, OrdersArgs, ProductsArgs};

/// Shop CLI - browse the catalog, place and manage orders
#[derive(Parser)]
#[command(name = "shop")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and administer catalog products
    Products(ProductsArgs),

    /// Browse and administer orders
    Orders(OrdersArgs),

    /// Place an order for a set of products
    Checkout(CheckoutArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let log_config = ctx.config.logging.to_log_config(cli.verbose);
    if let Err(e) = shop_observability::init_logging(&log_config) {
        ctx.output.warn(&format!("Logging disabled: {}", e));
    }
    if let Some(path) = &ctx.config_path {
        ctx.output.debug(&format!("Using config {}", path.display()));
    }

    let result = match cli.command {
        Commands::Products(args) => commands::products::run(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
