//! HTTP clients for the catalog and order services.

mod catalog;
mod orders;

pub use catalog::CatalogClient;
pub use orders::OrdersClient;

/// Default catalog service location.
pub const DEFAULT_PRODUCTS_URL: &str = "http://products-service:8080";
/// Default order service location.
pub const DEFAULT_ORDERS_URL: &str = "http://orders-service:8080";

const PRODUCTS_PATH: &str = "/api/products";
const ORDERS_PATH: &str = "/api/orders";
