//! Catalog commands.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use shop_commerce::catalog::{Availability, Product, ProductPatch};
use shop_commerce::ProductId;

use super::{ProductsArgs, ProductsCommand};
use crate::context::Context;
use crate::output::availability_badge;

const WIDTHS: [usize; 4] = [38, 28, 10, 14];

/// Run the products command.
pub async fn run(args: ProductsArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(ProductsCommand::List) | None => list_products(ctx).await,
        Some(ProductsCommand::Show { id }) => show_product(&id.into(), ctx).await,
        Some(ProductsCommand::Update {
            id,
            name,
            description,
            price,
            stock,
        }) => {
            let patch = ProductPatch {
                name,
                description,
                price,
                stock,
            };
            update_product(&id.into(), &patch, ctx).await
        }
        Some(ProductsCommand::Delete { id, yes }) => delete_product(&id.into(), yes, ctx).await,
    }
}

async fn list_products(ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading products...");
    let catalog = ctx.catalog().list_products().await;
    spinner.finish_and_clear();
    let catalog = catalog.context("Failed to fetch products")?;

    if ctx.output.is_json() {
        ctx.output.json(&catalog.into_products());
        return Ok(());
    }

    ctx.output.header("Products");
    if catalog.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }

    ctx.output.table_row(&["ID", "NAME", "PRICE", "STOCK"], &WIDTHS);
    for product in catalog.iter() {
        let price = product.price.display();
        let stock = availability_badge(Availability::from_remaining(product.stock));
        ctx.output
            .table_row(&[product.id.as_str(), &product.name, &price, &stock], &WIDTHS);
    }

    ctx.output.info("");
    ctx.output.info(&format!("Total: {} product(s)", catalog.len()));
    Ok(())
}

async fn show_product(id: &ProductId, ctx: &Context) -> Result<()> {
    let product = ctx.catalog().get_product(id).await?;
    print_product(&product, ctx);
    Ok(())
}

async fn update_product(id: &ProductId, patch: &ProductPatch, ctx: &Context) -> Result<()> {
    let product = ctx
        .catalog()
        .patch_product(id, patch)
        .await
        .with_context(|| format!("Failed to update product {}", id))?;

    ctx.output.success(&format!("Updated product {}", id));
    print_product(&product, ctx);
    Ok(())
}

async fn delete_product(id: &ProductId, yes: bool, ctx: &Context) -> Result<()> {
    let client = ctx.catalog();
    let product = client.get_product(id).await?;

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete product '{}' ({})?", product.name, id))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Delete cancelled");
            return Ok(());
        }
    }

    client.delete_product(id).await?;
    ctx.output.success(&format!("Deleted product {}", id));
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "deleted": id }));
    }
    Ok(())
}

fn print_product(product: &Product, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(product);
        return;
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv("price", &product.price.display());
    ctx.output.kv("stock", &product.stock.to_string());
    if !product.description.is_empty() {
        ctx.output.kv("description", &product.description);
    }
}
