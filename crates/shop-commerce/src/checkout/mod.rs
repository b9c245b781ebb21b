//! Checkout module.
//!
//! The coordinator submits a cart snapshot through an [`OrderGateway`] and
//! reconciles the cart with the outcome. Order records and their status
//! rules live here too since the admin side works on the same types.

mod coordinator;
mod gateway;
mod order;
mod payload;
mod result;

pub use coordinator::CheckoutCoordinator;
pub use gateway::OrderGateway;
pub use order::{Order, OrderItem, OrderStatus, StatusFilter};
pub use payload::{CreateOrderRequest, OrderItemRequest};
pub use result::CheckoutResult;
