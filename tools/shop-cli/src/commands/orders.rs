//! Order administration commands.

use anyhow::{bail, Context as _, Result};
use dialoguer::Confirm;
use shop_commerce::checkout::{Order, OrderStatus, StatusFilter};
use shop_commerce::OrderId;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::status_badge;

const WIDTHS: [usize; 4] = [38, 12, 21, 6];

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        None => list_orders(StatusFilter::All, ctx).await,
        Some(OrdersCommand::List { status }) => {
            let filter: StatusFilter = status.parse()?;
            list_orders(filter, ctx).await
        }
        Some(OrdersCommand::Show { id }) => show_order(&id.into(), ctx).await,
        Some(OrdersCommand::SetStatus { id, status }) => {
            let next: OrderStatus = status.parse()?;
            set_status(&id.into(), next, ctx).await
        }
        Some(OrdersCommand::Delete { id, yes }) => delete_order(&id.into(), yes, ctx).await,
    }
}

async fn list_orders(filter: StatusFilter, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading orders...");
    let orders = ctx.orders().list_orders(filter).await;
    spinner.finish_and_clear();
    let mut orders = orders.context("Failed to fetch orders")?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    match filter {
        StatusFilter::All => ctx.output.header("Orders"),
        StatusFilter::Only(status) => {
            ctx.output.header(&format!("Orders ({})", status.display_name()))
        }
    }
    if orders.is_empty() {
        ctx.output.info("No orders found.");
        return Ok(());
    }

    ctx.output
        .table_row(&["ID", "STATUS", "CREATED", "ITEMS"], &WIDTHS);
    for order in &orders {
        let created = format_timestamp(order);
        let status = status_badge(order.status);
        let items = order.item_count().to_string();
        ctx.output
            .table_row(&[order.id.as_str(), &status, &created, &items], &WIDTHS);
    }

    ctx.output.info("");
    ctx.output.info(&format!("Total: {} order(s)", orders.len()));
    Ok(())
}

async fn show_order(id: &OrderId, ctx: &Context) -> Result<()> {
    let order = ctx.orders().get_order(id).await?;
    print_order(&order, ctx);
    Ok(())
}

async fn set_status(id: &OrderId, next: OrderStatus, ctx: &Context) -> Result<()> {
    let client = ctx.orders();
    let order = client.get_order(id).await?;

    if order.deleted {
        bail!("Order {} is deleted and can no longer change status", id);
    }
    if !order.status.can_transition_to(next) {
        let allowed: Vec<&str> = order
            .status
            .allowed_transitions()
            .iter()
            .map(|s| s.as_str())
            .collect();
        if allowed.is_empty() {
            bail!(
                "Order {} is {} and can no longer change status",
                id,
                order.status
            );
        }
        bail!(
            "Order {} cannot move from {} to {} (allowed: {})",
            id,
            order.status,
            next,
            allowed.join(", ")
        );
    }

    let updated = client.update_status(&order, next).await?;
    ctx.output.success(&format!(
        "Order {}: {} -> {}",
        id,
        order.status,
        updated.status
    ));
    if ctx.output.is_json() {
        ctx.output.json(&updated);
    }
    Ok(())
}

async fn delete_order(id: &OrderId, yes: bool, ctx: &Context) -> Result<()> {
    let client = ctx.orders();
    let order = client.get_order(id).await?;

    if order.status.cancels_on_delete() {
        ctx.output.warn(&format!(
            "Order {} is {}; it will be canceled before it is deleted",
            id, order.status
        ));
    }

    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete order {}?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Delete cancelled");
            return Ok(());
        }
    }

    client.delete_order(id).await?;
    ctx.output.success(&format!("Deleted order {}", id));
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "deleted": id,
            "canceled": order.status.cancels_on_delete(),
        }));
    }
    Ok(())
}

fn print_order(order: &Order, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(order);
        return;
    }

    ctx.output.header(&format!("Order {}", order.id));
    ctx.output.kv("status", &status_badge(order.status));
    ctx.output.kv("created", &format_timestamp(order));
    if order.deleted {
        ctx.output.kv("deleted", "yes");
    }

    ctx.output.info("");
    for item in &order.items {
        let name = if item.product_name.is_empty() {
            item.product_id.as_str()
        } else {
            item.product_name.as_str()
        };
        ctx.output
            .list_item(&format!("{} x {} ({})", item.quantity, name, item.product_id));
    }
}

/// Creation time in the local timezone.
fn format_timestamp(order: &Order) -> String {
    match order.created_at {
        Some(ts) => ts
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}
