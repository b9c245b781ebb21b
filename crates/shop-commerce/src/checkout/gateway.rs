//! Order submission seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::checkout::CreateOrderRequest;
use crate::error::CommerceError;

/// Something that can place an order.
///
/// Implementations submit exactly once. Non-2xx answers map to
/// [`CommerceError::CheckoutRejected`] and transport failures to
/// [`CommerceError::NetworkUnavailable`]. The created order, if any, is
/// not needed by the caller.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), CommerceError>;
}

#[async_trait]
impl<G: OrderGateway + ?Sized> OrderGateway for Arc<G> {
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), CommerceError> {
        (**self).create_order(request).await
    }
}
