//! Shared cart handle.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cart::{
    CartCommand, CartEvent, CartLine, CartMode, CartPricing, CartSnapshot, CartState, LinePricing,
};
use crate::catalog::{Availability, Product};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

/// Whether adds are checked against the product's stock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockPolicy {
    /// Reject adds that would take the line above `product.stock`.
    #[default]
    Enforce,
    /// Accept any positive quantity.
    Ignore,
}

/// Cloneable handle to one session's cart.
///
/// Clones share the same state. Every mutation goes through
/// [`CartStore::dispatch`], which swaps in the state computed by
/// [`CartState::reduce`] under a single write lock.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    state: Arc<RwLock<CartState>>,
    policy: StockPolicy,
}

impl CartStore {
    /// Create an empty, stock-enforcing cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cart with the given stock policy.
    pub fn with_policy(policy: StockPolicy) -> Self {
        Self {
            state: Arc::default(),
            policy,
        }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    /// Apply a command atomically.
    pub fn dispatch(&self, command: CartCommand) -> Result<CartEvent, CommerceError> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let (next, event) = state.reduce(command)?;
        *state = next;
        debug!(
            event = ?event,
            lines = state.len(),
            items = state.item_count(),
            "cart updated"
        );
        Ok(event)
    }

    /// Add `quantity` units of a product.
    ///
    /// Under [`StockPolicy::Enforce`] an add past the product's stock
    /// returns [`CartEvent::Rejected`] and leaves the cart unchanged.
    pub fn add_item(&self, product: &Product, quantity: i64) -> Result<CartEvent, CommerceError> {
        let stock_limit = match self.policy {
            StockPolicy::Enforce => Some(product.stock),
            StockPolicy::Ignore => None,
        };
        self.dispatch(CartCommand::AddItem {
            line: CartLine::from_product(product, quantity),
            stock_limit,
        })
    }

    /// Remove a product's line. No-op when absent.
    pub fn remove_item(&self, product_id: &ProductId) -> Result<CartEvent, CommerceError> {
        self.dispatch(CartCommand::RemoveItem {
            product_id: product_id.clone(),
        })
    }

    /// Empty the cart.
    pub fn clear(&self) -> Result<CartEvent, CommerceError> {
        self.dispatch(CartCommand::Clear)
    }

    /// Deduct the quantities of a submitted snapshot.
    pub fn settle(&self, submitted: &CartSnapshot) -> Result<CartEvent, CommerceError> {
        self.dispatch(CartCommand::Settle {
            submitted: submitted.clone(),
        })
    }

    /// Copy of the current contents.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::capture(&self.read())
    }

    /// Current state by value.
    pub fn state(&self) -> CartState {
        self.read().clone()
    }

    pub fn lines(&self) -> Vec<CartLine> {
        self.read().lines().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn mode(&self) -> CartMode {
        self.read().mode()
    }

    pub fn item_count(&self) -> i64 {
        self.read().item_count()
    }

    /// Quantity of a product already in the cart.
    pub fn current_quantity(&self, product_id: &ProductId) -> i64 {
        self.read().quantity_of(product_id)
    }

    /// `product.stock` minus what is already in the cart. May be negative.
    pub fn available_stock(&self, product: &Product) -> i64 {
        product
            .stock
            .saturating_sub(self.current_quantity(&product.id))
    }

    pub fn availability(&self, product: &Product) -> Availability {
        Availability::from_remaining(self.available_stock(product))
    }

    /// Whether the add-to-cart control for a product should be enabled.
    pub fn can_add(&self, product: &Product) -> bool {
        match self.policy {
            StockPolicy::Enforce => self.availability(product).can_add(),
            StockPolicy::Ignore => true,
        }
    }

    /// Line total at the product's current catalog price.
    pub fn line_total(&self, line: &CartLine, product: &Product) -> Result<Money, CommerceError> {
        product
            .price
            .try_multiply(line.quantity)
            .ok_or(CommerceError::Overflow)
    }

    /// Sum of line totals at the prices captured when lines were added.
    pub fn grand_total(&self) -> Result<Money, CommerceError> {
        Ok(self.pricing()?.grand_total)
    }

    /// Per-line breakdown and grand total.
    pub fn pricing(&self) -> Result<CartPricing, CommerceError> {
        let state = self.read();
        let line_items = state
            .lines()
            .iter()
            .map(|line| {
                Ok(LinePricing {
                    product_id: line.product_id.clone(),
                    product_name: line.product_name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                    total: line.total()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let grand_total = Money::try_sum(line_items.iter().map(|l| &l.total))
            .ok_or(CommerceError::Overflow)?;

        Ok(CartPricing {
            item_count: state.item_count(),
            line_items,
            grand_total,
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, CartState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }
}
