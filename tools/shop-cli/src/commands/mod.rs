//! CLI command implementations.

pub mod checkout;
pub mod config;
pub mod orders;
pub mod products;

use clap::{Args, Subcommand};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: Option<ProductsCommand>,
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List all products.
    List,
    /// Show one product.
    Show {
        /// Product ID.
        id: String,
    },
    /// Change fields of a product.
    Update {
        /// Product ID.
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Unit price as a decimal (e.g. 12.50).
        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        stock: Option<i64>,
    },
    /// Delete a product.
    Delete {
        /// Product ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: Option<OrdersCommand>,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders.
    List {
        /// "all" or one of created, shipped, delivered, returned, canceled.
        #[arg(short, long, default_value = "all")]
        status: String,
    },
    /// Show one order.
    Show {
        /// Order ID.
        id: String,
    },
    /// Move an order to another status.
    SetStatus {
        /// Order ID.
        id: String,
        /// New status.
        status: String,
    },
    /// Delete an order (canceling it first if still open).
    Delete {
        /// Order ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Item to buy, as PRODUCT_ID or PRODUCT_ID:QUANTITY. Repeatable.
    #[arg(short, long = "item", value_name = "ID[:QTY]")]
    pub items: Vec<String>,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Build and price the cart without placing the order.
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Print the path of the config file in use.
    Path,
    /// Write a default shop.toml in the current directory.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
