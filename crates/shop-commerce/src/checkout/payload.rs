//! Order creation payload.

use serde::{Deserialize, Serialize};

use crate::cart::CartSnapshot;
use crate::ids::ProductId;

/// One line of an order request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
}

/// Body of `POST /api/orders`: `{"items": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemRequest>,
}

impl CreateOrderRequest {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&CartSnapshot> for CreateOrderRequest {
    fn from(snapshot: &CartSnapshot) -> Self {
        Self {
            items: snapshot
                .lines()
                .iter()
                .map(|line| OrderItemRequest {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}
