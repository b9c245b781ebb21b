//! Order types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};

/// Order status as stored by the order service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Order placed.
    #[default]
    Created,
    /// Handed to the carrier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Sent back after delivery.
    Returned,
    /// Canceled before delivery.
    Canceled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Created,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Returned,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Returned => "returned",
            OrderStatus::Canceled => "canceled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Returned => "Returned",
            OrderStatus::Canceled => "Canceled",
        }
    }

    /// No further transitions are allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Returned | OrderStatus::Canceled)
    }

    /// Whether an order in this status may be moved to `next`.
    ///
    /// Delivered orders can only be returned. Re-applying the current
    /// status is not a transition.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        if *self == next || self.is_terminal() {
            return false;
        }
        match self {
            OrderStatus::Delivered => next == OrderStatus::Returned,
            _ => true,
        }
    }

    /// Statuses reachable from this one.
    pub fn allowed_transitions(&self) -> Vec<OrderStatus> {
        Self::ALL
            .into_iter()
            .filter(|next| self.can_transition_to(*next))
            .collect()
    }

    /// Deleting an order in this status cancels it first.
    pub fn cancels_on_delete(&self) -> bool {
        matches!(self, OrderStatus::Created | OrderStatus::Shipped)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| CommerceError::ValidationError(format!("unknown order status '{}'", s)))
    }
}

/// Which orders an admin list shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    pub fn matches(&self, order: &Order) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(status) => order.status == *status,
        }
    }

    /// Keep the matching orders.
    pub fn apply(&self, orders: Vec<Order>) -> Vec<Order> {
        orders.into_iter().filter(|o| self.matches(o)).collect()
    }
}

impl FromStr for StatusFilter {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// A line of a stored order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: String,
    pub quantity: i64,
}

/// An order as returned by the order service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order identifier.
    pub id: OrderId,
    /// Current status.
    #[serde(default)]
    pub status: OrderStatus,
    /// When the order was placed. `None` when the service sent no
    /// usable RFC 3339 timestamp.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Items in the order.
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Soft-delete marker.
    #[serde(default)]
    pub deleted: bool,
}

impl Order {
    /// Total units across items.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Check a status change against the transition rules.
    ///
    /// Deleted orders accept no changes at all.
    pub fn check_transition(&self, next: OrderStatus) -> Result<(), CommerceError> {
        if self.deleted {
            return Err(CommerceError::OrderDeleted(self.id.to_string()));
        }
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(CommerceError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            })
        }
    }
}

/// One bad timestamp must not fail a whole order listing.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|ts| ts.with_timezone(&Utc)))
}
