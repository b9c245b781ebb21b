//! Order service client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use shop_data::{FetchClient, FetchError, TraceContext};
use tracing::{info, warn};

use super::ORDERS_PATH;
use crate::checkout::{CreateOrderRequest, Order, OrderGateway, OrderStatus, StatusFilter};
use crate::error::CommerceError;
use crate::ids::OrderId;

#[derive(Serialize)]
struct StatusPatch {
    status: OrderStatus,
}

/// Places and administers orders on the order service.
#[derive(Debug, Clone)]
pub struct OrdersClient {
    http: FetchClient,
}

impl OrdersClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_client(FetchClient::new().with_base_url(base_url))
    }

    pub fn from_client(http: FetchClient) -> Self {
        Self { http }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    /// Send every request as a child span of `parent`.
    pub fn with_trace_parent(mut self, parent: TraceContext) -> Self {
        self.http = self.http.with_trace_parent(parent);
        self
    }

    /// `GET /api/orders`, filtered locally.
    pub async fn list_orders(&self, filter: StatusFilter) -> Result<Vec<Order>, CommerceError> {
        let orders: Vec<Order> = self.http.get(ORDERS_PATH).send_json().await?;
        Ok(filter.apply(orders))
    }

    /// `GET /api/orders/:id`
    pub async fn get_order(&self, id: &OrderId) -> Result<Order, CommerceError> {
        self.http
            .get(order_path(id))
            .send_json()
            .await
            .map_err(|e| not_found(e, id))
    }

    /// `POST /api/orders`
    ///
    /// Returns the created order when the body parses as one. A 2xx with
    /// any other body still counts as placed.
    pub async fn place_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<Option<Order>, CommerceError> {
        let response = self
            .http
            .post(ORDERS_PATH)
            .json(request)?
            .send()
            .await
            .map_err(rejection)?
            .error_for_status()
            .map_err(rejection)?;

        let order = response.json::<Order>().ok();
        match &order {
            Some(order) => info!(order_id = %order.id, items = order.item_count(), "order created"),
            None => info!(status = response.status, "order created"),
        }
        Ok(order)
    }

    /// `PATCH /api/orders/:id` with a new status.
    ///
    /// The transition is checked locally first, so changes to a deleted
    /// order or out of a terminal status never reach the service.
    pub async fn update_status(
        &self,
        order: &Order,
        next: OrderStatus,
    ) -> Result<Order, CommerceError> {
        order.check_transition(next)?;
        let updated: Order = self
            .http
            .patch(order_path(&order.id))
            .json(&StatusPatch { status: next })?
            .send_json()
            .await
            .map_err(|e| not_found(e, &order.id))?;
        info!(order_id = %order.id, from = %order.status, to = %next, "order status changed");
        Ok(updated)
    }

    /// `DELETE /api/orders/:id`
    ///
    /// The service soft-deletes, canceling first unless the order is
    /// already delivered, canceled or returned.
    pub async fn delete_order(&self, id: &OrderId) -> Result<(), CommerceError> {
        self.http
            .delete(order_path(id))
            .send_empty()
            .await
            .map_err(|e| not_found(e, id))?;
        info!(order_id = %id, "order deleted");
        Ok(())
    }
}

#[async_trait]
impl OrderGateway for OrdersClient {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), CommerceError> {
        self.place_order(request).await.map(|_| ())
    }
}

fn order_path(id: &OrderId) -> String {
    format!("{}/{}", ORDERS_PATH, id)
}

fn not_found(err: FetchError, id: &OrderId) -> CommerceError {
    match err.status() {
        Some(404) => CommerceError::OrderNotFound(id.to_string()),
        _ => err.into(),
    }
}

/// Map a failed order submission. HTTP errors become rejections carrying
/// the upstream message.
fn rejection(err: FetchError) -> CommerceError {
    match err {
        FetchError::HttpError { status, message } => {
            warn!(status, message = ?message, "order service rejected the order");
            CommerceError::CheckoutRejected {
                status: Some(status),
                message,
            }
        }
        other => {
            if other.is_transport() {
                warn!(error = %other, "order service unreachable");
            }
            other.into()
        }
    }
}
