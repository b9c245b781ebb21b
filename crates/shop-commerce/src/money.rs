//! Money type for representing monetary values.
//!
//! Uses cents-based integer representation to avoid floating-point
//! precision issues. Every price in the system is US dollars. The catalog
//! service sends prices as JSON decimals; [`decimal`] converts at the
//! serde boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A US dollar amount, stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a dollar amount, rounding to the nearest cent.
    ///
    /// ```
    /// use shop_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_cents, 4999);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * 100.0).round() as i64)
    }

    /// Zero dollars.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount_cents == 0
    }

    /// Convert to a dollar amount.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("${:.2}", self.to_decimal())
    }

    /// Add another Money value. None on overflow.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount_cents.checked_add(other.amount_cents).map(Money::new)
    }

    /// Multiply by a quantity. None on overflow.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount_cents.checked_mul(factor).map(Money::new)
    }

    /// Sum Money values. None on overflow.
    pub fn try_sum<'a>(mut iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        iter.try_fold(Money::zero(), |acc, m| acc.try_add(m))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Serde adapter for prices sent as plain JSON numbers (`"price": 49.99`).
pub mod decimal {
    use super::Money;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(money: &Money, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(money.to_decimal())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Money, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() || amount < 0.0 {
            return Err(D::Error::custom("price must be a non-negative number"));
        }
        Ok(Money::from_decimal(amount))
    }
}
