//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, ORDERS_URL_ENV, PRODUCTS_URL_ENV};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Path => show_path(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    ctx.output.header("Current Configuration");

    ctx.output.info("[services]");
    ctx.output.kv("products_url", &ctx.config.services.products_url);
    ctx.output.kv("orders_url", &ctx.config.services.orders_url);
    ctx.output
        .kv("timeout_secs", &ctx.config.services.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output
        .kv("level", ctx.config.logging.level.as_directive());
    ctx.output.kv("format", ctx.config.logging.format.as_str());

    ctx.output.info("");
    ctx.output.info("[cart]");
    ctx.output
        .kv("enforce_stock", &ctx.config.cart.enforce_stock.to_string());

    let overrides: Vec<&str> = [PRODUCTS_URL_ENV, ORDERS_URL_ENV]
        .into_iter()
        .filter(|key| std::env::var_os(key).is_some())
        .collect();
    if !overrides.is_empty() {
        ctx.output.info("");
        ctx.output.info("Overridden by environment:");
        for key in overrides {
            ctx.output.list_item(key);
        }
    }

    Ok(())
}

fn show_path(ctx: &Context) -> Result<()> {
    match &ctx.config_path {
        Some(path) if ctx.output.is_json() => {
            ctx.output.json(&serde_json::json!({ "path": path }));
        }
        Some(path) => println!("{}", path.display()),
        None => {
            ctx.output.info("No config file found; using defaults.");
            ctx.output.info("Run `shop config init` to create one.");
        }
    }
    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("shop.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}
