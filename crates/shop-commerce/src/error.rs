//! Commerce error types.

use thiserror::Error;

/// Message shown when an order could not be created and upstream gave no reason.
pub const GENERIC_CHECKOUT_FAILURE: &str = "Failed to create order";

/// Errors that can occur in cart, checkout and admin operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Checkout attempted with nothing in the cart. Never reaches the network.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// A checkout is already awaiting the order service.
    #[error("A checkout is already in progress")]
    CheckoutInProgress,

    /// The order service declined or failed the order.
    #[error("Checkout rejected: {}", .message.as_deref().unwrap_or(GENERIC_CHECKOUT_FAILURE))]
    CheckoutRejected {
        status: Option<u16>,
        message: Option<String>,
    },

    /// The order service could not be reached.
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Non-2xx answer from an upstream service outside of checkout.
    #[error("Upstream returned HTTP {status}: {}", .message.as_deref().unwrap_or("no error message"))]
    Upstream {
        status: u16,
        message: Option<String>,
    },

    /// Status change attempted on a soft-deleted order.
    #[error("Cannot modify a deleted order: {0}")]
    OrderDeleted(String),

    /// Order status change not allowed from the current status.
    #[error("Invalid order status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    /// Misconfigured client (bad base URL and similar).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl CommerceError {
    /// Text suitable for a dismissible message in the UI.
    ///
    /// Transport failures read the same as a rejection without a reason.
    pub fn user_message(&self) -> String {
        match self {
            CommerceError::EmptyCart => "Your cart is empty.".to_string(),
            CommerceError::CheckoutInProgress => "Checkout already in progress.".to_string(),
            CommerceError::CheckoutRejected { message, .. } => message
                .clone()
                .unwrap_or_else(|| GENERIC_CHECKOUT_FAILURE.to_string()),
            CommerceError::NetworkUnavailable(_) => GENERIC_CHECKOUT_FAILURE.to_string(),
            CommerceError::Upstream {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "remote")]
impl From<shop_data::FetchError> for CommerceError {
    fn from(e: shop_data::FetchError) -> Self {
        use shop_data::FetchError;

        match e {
            FetchError::HttpError { status, message } => CommerceError::Upstream { status, message },
            FetchError::RequestError(reason) => CommerceError::NetworkUnavailable(reason),
            FetchError::Timeout => CommerceError::NetworkUnavailable("request timed out".to_string()),
            FetchError::InvalidUrl(reason) => CommerceError::Configuration(reason),
            FetchError::ParseError(reason) | FetchError::JsonError(reason) => {
                CommerceError::SerializationError(reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_message_prefers_upstream_text() {
        let err = CommerceError::CheckoutRejected {
            status: Some(500),
            message: Some("out of stock".to_string()),
        };
        assert_eq!(err.user_message(), "out of stock");
        assert_eq!(err.to_string(), "Checkout rejected: out of stock");
    }

    #[test]
    fn test_rejection_without_reason_is_generic() {
        let err = CommerceError::CheckoutRejected {
            status: Some(502),
            message: None,
        };
        assert_eq!(err.user_message(), GENERIC_CHECKOUT_FAILURE);
        assert_eq!(
            CommerceError::NetworkUnavailable("connection refused".into()).user_message(),
            GENERIC_CHECKOUT_FAILURE
        );
    }

    #[cfg(feature = "remote")]
    #[test]
    fn test_fetch_error_mapping() {
        use shop_data::FetchError;

        assert_eq!(
            CommerceError::from(FetchError::Timeout),
            CommerceError::NetworkUnavailable("request timed out".to_string())
        );
        assert_eq!(
            CommerceError::from(FetchError::HttpError {
                status: 404,
                message: Some("Order not found".into())
            }),
            CommerceError::Upstream {
                status: 404,
                message: Some("Order not found".into())
            }
        );
    }
}
