//! Checkout outcome exposed to the rendering layer.

use serde::{Deserialize, Serialize};

/// State of the last checkout attempt.
///
/// Serializes as `{"status": "idle" | "pending" | "success" | "error", "message"?: string}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CheckoutResult {
    #[default]
    Idle,
    Pending,
    Success,
    Error { message: String },
}

impl CheckoutResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutResult::Idle => "idle",
            CheckoutResult::Pending => "pending",
            CheckoutResult::Success => "success",
            CheckoutResult::Error { .. } => "error",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CheckoutResult::Pending)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            CheckoutResult::Error { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        assert_eq!(
            serde_json::to_value(CheckoutResult::Success).unwrap(),
            serde_json::json!({"status": "success"})
        );
        assert_eq!(
            serde_json::to_value(CheckoutResult::Error {
                message: "out of stock".into()
            })
            .unwrap(),
            serde_json::json!({"status": "error", "message": "out of stock"})
        );
    }
}
