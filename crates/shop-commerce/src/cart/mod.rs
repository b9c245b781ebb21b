//! Shopping cart module.
//!
//! `CartState` is a plain value with a pure transition function over
//! `CartCommand`. `CartStore` is the shared handle the storefront and the
//! checkout coordinator hold; it is the only place state is replaced.

mod line;
mod pricing;
mod state;
mod store;

pub use line::CartLine;
pub use pricing::{CartPricing, LinePricing};
pub use state::{CartCommand, CartEvent, CartMode, CartSnapshot, CartState, MAX_QUANTITY_PER_ITEM};
pub use store::{CartStore, StockPolicy};
