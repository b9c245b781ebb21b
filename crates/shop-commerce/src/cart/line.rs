//! Cart line items.

use crate::catalog::Product;
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// One product-and-quantity entry in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Product being purchased.
    pub product_id: ProductId,
    /// Product name (denormalized at add time).
    pub product_name: String,
    /// Unit price (denormalized at add time).
    pub unit_price: Money,
    /// Quantity, always at least 1 while the line exists.
    pub quantity: i64,
    /// Assigned by the cart when the line is appended. A product removed
    /// and added again gets a new generation.
    #[serde(default)]
    pub(crate) generation: u64,
}

impl CartLine {
    /// Create a line for a product.
    pub fn new(
        product_id: ProductId,
        product_name: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        Self {
            product_id,
            product_name: product_name.into(),
            unit_price,
            quantity,
            generation: 0,
        }
    }

    /// Create a line from a catalog product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        Self::new(product.id.clone(), product.name.clone(), product.price, quantity)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Unit price times quantity, at the price captured when the line was added.
    pub fn total(&self) -> Result<Money, CommerceError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CommerceError::Overflow)
    }
}
