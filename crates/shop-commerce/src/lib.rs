//! Cart, checkout and order domain logic for the shopfront.
//!
//! - **Catalog**: products as served by the catalog service, availability
//! - **Cart**: the cart store, its commands and derived totals
//! - **Checkout**: the checkout coordinator, order payloads, order records
//! - **Api** (feature `remote`): HTTP clients for the product and order services
//!
//! # Example
//!
//! ```rust,ignore
//! use shop_commerce::prelude::*;
//!
//! let catalog = CatalogClient::new("http://products-service:8080").list_products().await?;
//! let store = CartStore::new();
//! for product in catalog.iter() {
//!     store.add_item(product, 1)?;
//! }
//!
//! let coordinator = CheckoutCoordinator::new(
//!     store.clone(),
//!     OrdersClient::new("http://orders-service:8080"),
//! );
//! coordinator.checkout().await?;
//! assert!(store.is_empty());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod checkout;

#[cfg(feature = "remote")]
pub mod api;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Availability, Catalog, Product, ProductPatch};

    // Cart
    pub use crate::cart::{
        CartCommand, CartEvent, CartLine, CartMode, CartPricing, CartSnapshot, CartState,
        CartStore, LinePricing, StockPolicy,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutCoordinator, CheckoutResult, CreateOrderRequest, Order, OrderGateway, OrderItem,
        OrderItemRequest, OrderStatus, StatusFilter,
    };

    #[cfg(feature = "remote")]
    pub use crate::api::{CatalogClient, OrdersClient};
}
