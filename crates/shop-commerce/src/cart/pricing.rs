//! Cart pricing calculations.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Pricing breakdown for a cart, as handed to the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartPricing {
    /// Per-line breakdown, in cart order.
    pub line_items: Vec<LinePricing>,
    /// Total units across all lines.
    pub item_count: i64,
    /// Sum of line totals.
    pub grand_total: Money,
}

impl CartPricing {
    /// Grand total formatted for display (e.g., "$24.98").
    pub fn display_total(&self) -> String {
        self.grand_total.display()
    }

    /// Whether there is anything to pay for.
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }
}

/// Pricing for a single line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinePricing {
    pub product_id: ProductId,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    /// unit_price * quantity.
    pub total: Money,
}
