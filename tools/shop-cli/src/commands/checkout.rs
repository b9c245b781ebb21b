//! Checkout command.

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use shop_commerce::cart::{CartEvent, CartStore};
use shop_commerce::checkout::CheckoutCoordinator;
use shop_commerce::ProductId;
use thiserror::Error;

use super::CheckoutArgs;
use crate::context::Context;

const WIDTHS: [usize; 4] = [28, 6, 10, 10];

/// A malformed `--item` value.
#[derive(Debug, Error, PartialEq)]
pub enum ItemSpecError {
    #[error("item '{0}' has no product id")]
    MissingId(String),

    #[error("item '{0}' has an invalid quantity")]
    BadQuantity(String),
}

/// One `--item` value: a product and how many to add.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    pub quantity: i64,
}

impl std::str::FromStr for ItemSpec {
    type Err = ItemSpecError;

    /// `ID` or `ID:QTY`. The quantity is taken after the last colon.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (id, quantity) = match s.rsplit_once(':') {
            Some((id, qty)) => {
                let quantity = qty
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ItemSpecError::BadQuantity(s.to_string()))?;
                (id.trim(), quantity)
            }
            None => (s, 1),
        };

        if id.is_empty() {
            return Err(ItemSpecError::MissingId(s.to_string()));
        }

        Ok(Self {
            product_id: ProductId::new(id),
            quantity,
        })
    }
}

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let specs = args
        .items
        .iter()
        .map(|raw| raw.parse::<ItemSpec>())
        .collect::<Result<Vec<_>, _>>()?;

    let spinner = ctx.output.spinner("Loading catalog...");
    let catalog = ctx.catalog().list_products().await;
    spinner.finish_and_clear();
    let catalog = catalog.context("Failed to fetch products")?;

    let store = CartStore::with_policy(ctx.config.stock_policy());
    for spec in &specs {
        let product = catalog.require(&spec.product_id)?;
        match store.add_item(product, spec.quantity)? {
            CartEvent::Rejected { available } => ctx.output.warn(&format!(
                "Skipped {} x {}: only {} more in stock",
                spec.quantity,
                product.name,
                available.max(0)
            )),
            event => ctx
                .output
                .debug(&format!("{:?} {} x {}", event, spec.quantity, product.name)),
        }
    }

    print_cart(&store, ctx)?;

    if args.dry_run {
        ctx.output.info("Dry run - no order placed");
        return Ok(());
    }

    if !args.yes && !ctx.output.is_json() && !store.is_empty() {
        let confirmed = Confirm::new()
            .with_prompt("Place this order?")
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let coordinator = CheckoutCoordinator::new(store.clone(), ctx.orders());
    let spinner = ctx.output.spinner("Placing order...");
    let outcome = coordinator.checkout().await;
    spinner.finish_and_clear();

    if ctx.output.is_json() {
        ctx.output.json(&coordinator.result());
    }

    match outcome {
        Ok(()) => {
            ctx.output.success("Order placed");
            Ok(())
        }
        Err(err) => {
            tracing::debug!(error = %err, "checkout failed");
            Err(anyhow::anyhow!(err.user_message()))
        }
    }
}

fn print_cart(store: &CartStore, ctx: &Context) -> Result<()> {
    let pricing = store.pricing()?;

    if ctx.output.is_json() {
        ctx.output.json(&pricing);
        return Ok(());
    }

    ctx.output.header("Cart");
    if pricing.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    ctx.output.table_row(&["PRODUCT", "QTY", "PRICE", "TOTAL"], &WIDTHS);
    for line in &pricing.line_items {
        let quantity = line.quantity.to_string();
        let price = line.unit_price.display();
        let total = line.total.display();
        ctx.output
            .table_row(&[&line.product_name, &quantity, &price, &total], &WIDTHS);
    }
    ctx.output.info("");
    ctx.output.kv("items", &pricing.item_count.to_string());
    ctx.output.kv("total", &pricing.display_total());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_item_defaults_to_one() {
        let spec: ItemSpec = "p1".parse().unwrap();
        assert_eq!(spec.product_id.as_str(), "p1");
        assert_eq!(spec.quantity, 1);
    }

    #[test]
    fn test_parse_item_with_quantity() {
        let spec: ItemSpec = " p1:3 ".parse().unwrap();
        assert_eq!(spec.quantity, 3);

        let spec: ItemSpec = "urn:sku:42:2".parse().unwrap();
        assert_eq!(spec.product_id.as_str(), "urn:sku:42");
        assert_eq!(spec.quantity, 2);
    }

    #[test]
    fn test_parse_item_errors() {
        assert_eq!(
            ":2".parse::<ItemSpec>(),
            Err(ItemSpecError::MissingId(":2".to_string()))
        );
        assert_eq!(
            "p1:many".parse::<ItemSpec>(),
            Err(ItemSpecError::BadQuantity("p1:many".to_string()))
        );
        assert!("".parse::<ItemSpec>().is_err());
    }
}
