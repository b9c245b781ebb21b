//! Availability shown next to a product.

use serde::{Deserialize, Serialize};

/// How many more units of a product can go into the cart.
///
/// Built from `stock - quantity already in cart`. That difference can go
/// negative when stock drops upstream after items were added; it is kept
/// as-is here and clamped only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "remaining", rename_all = "snake_case")]
pub enum Availability {
    /// At least one more unit can be added.
    InStock(i64),
    /// Nothing left to add. Carries the raw (possibly negative) remainder.
    OutOfStock(i64),
}

impl Availability {
    /// Classify a raw remaining count.
    pub fn from_remaining(remaining: i64) -> Self {
        if remaining > 0 {
            Availability::InStock(remaining)
        } else {
            Availability::OutOfStock(remaining)
        }
    }

    /// The raw remainder, unclamped.
    pub fn remaining(&self) -> i64 {
        match self {
            Availability::InStock(n) | Availability::OutOfStock(n) => *n,
        }
    }

    /// Remaining count clamped at zero.
    pub fn display_quantity(&self) -> i64 {
        self.remaining().max(0)
    }

    /// Whether the add-to-cart control should be enabled.
    pub fn can_add(&self) -> bool {
        matches!(self, Availability::InStock(_))
    }

    /// Label for the product card.
    pub fn label(&self) -> String {
        match self {
            Availability::InStock(n) => format!("{} in stock", n),
            Availability::OutOfStock(_) => "Out of Stock".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert_eq!(Availability::from_remaining(2), Availability::InStock(2));
        assert_eq!(Availability::from_remaining(0), Availability::OutOfStock(0));
        assert!(!Availability::from_remaining(0).can_add());
    }

    #[test]
    fn test_negative_remainder_kept_but_clamped_for_display() {
        let availability = Availability::from_remaining(-2);
        assert_eq!(availability.remaining(), -2);
        assert_eq!(availability.display_quantity(), 0);
        assert_eq!(availability.label(), "Out of Stock");
    }

    #[test]
    fn test_label() {
        assert_eq!(Availability::InStock(3).label(), "3 in stock");
    }
}
