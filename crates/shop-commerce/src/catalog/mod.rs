//! Catalog module.
//!
//! Read-only product records as served by the catalog service, plus the
//! availability labels the storefront shows next to them.

mod availability;
mod product;

pub use availability::Availability;
pub use product::{Catalog, Product, ProductPatch};
