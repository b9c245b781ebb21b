//! Cart state and its transition function.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartLine;
use crate::error::CommerceError;
use crate::ids::ProductId;

/// Maximum quantity allowed per line item.
pub const MAX_QUANTITY_PER_ITEM: i64 = 9999;

/// Commands accepted by the cart.
#[derive(Debug, Clone, PartialEq)]
pub enum CartCommand {
    /// Add `line.quantity` units, merging into an existing line for the product.
    ///
    /// With `stock_limit` set, an add that would take the line above it is
    /// rejected without error.
    AddItem {
        line: CartLine,
        stock_limit: Option<i64>,
    },
    /// Drop the line for a product, if any.
    RemoveItem { product_id: ProductId },
    /// Drop every line.
    Clear,
    /// Remove exactly the quantities of a submitted snapshot.
    ///
    /// Applied after a successful checkout. Lines added or topped up while
    /// the order was in flight keep the difference. Only lines of the same
    /// generation as the submitted ones are deducted, so a product removed
    /// or cleared and then added again survives in full.
    Settle { submitted: CartSnapshot },
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartEvent {
    /// A new line was appended.
    Added,
    /// An existing line's quantity was increased.
    Merged,
    /// The add would exceed stock; nothing changed.
    Rejected { available: i64 },
    /// A line was removed.
    Removed,
    /// The cart went from non-empty to empty.
    Cleared,
    /// Submitted quantities were deducted.
    Settled,
    /// The command was a no-op.
    Unchanged,
}

impl CartEvent {
    /// Whether the state changed.
    pub fn changed(&self) -> bool {
        !matches!(self, CartEvent::Rejected { .. } | CartEvent::Unchanged)
    }
}

/// The two modes the cart can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartMode {
    Empty,
    NonEmpty,
}

/// The cart contents.
///
/// At most one line per product; every line has quantity >= 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    lines: Vec<CartLine>,
    /// Generation handed to the next appended line. Never reset.
    #[serde(default)]
    next_generation: u64,
}

impl CartState {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for a product.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product_id == product_id)
    }

    /// Quantity of a product in the cart, or 0.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.line(product_id).map_or(0, |l| l.quantity)
    }

    /// Total units across lines.
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Empty or not.
    pub fn mode(&self) -> CartMode {
        if self.is_empty() {
            CartMode::Empty
        } else {
            CartMode::NonEmpty
        }
    }

    /// Compute the state that results from a command.
    ///
    /// Pure: `self` is left untouched. Errors leave no partial state behind.
    pub fn reduce(&self, command: CartCommand) -> Result<(CartState, CartEvent), CommerceError> {
        match command {
            CartCommand::AddItem { line, stock_limit } => self.add(line, stock_limit),
            CartCommand::RemoveItem { product_id } => Ok(self.remove(&product_id)),
            CartCommand::Clear => Ok(self.clear()),
            CartCommand::Settle { submitted } => Ok(self.settle(&submitted)),
        }
    }

    fn add(
        &self,
        line: CartLine,
        stock_limit: Option<i64>,
    ) -> Result<(CartState, CartEvent), CommerceError> {
        if line.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(line.quantity));
        }

        let current = self.quantity_of(&line.product_id);
        let new_quantity = current
            .checked_add(line.quantity)
            .ok_or(CommerceError::Overflow)?;

        if let Some(limit) = stock_limit {
            if new_quantity > limit {
                return Ok((
                    self.clone(),
                    CartEvent::Rejected {
                        available: limit.saturating_sub(current),
                    },
                ));
            }
        }

        if new_quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                new_quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let mut next = self.clone();
        if let Some(existing) = next
            .lines
            .iter_mut()
            .find(|l| l.product_id == line.product_id)
        {
            existing.quantity = new_quantity;
            Ok((next, CartEvent::Merged))
        } else {
            next.lines.push(CartLine {
                generation: next.next_generation,
                ..line
            });
            next.next_generation += 1;
            Ok((next, CartEvent::Added))
        }
    }

    fn remove(&self, product_id: &ProductId) -> (CartState, CartEvent) {
        if self.line(product_id).is_none() {
            return (self.clone(), CartEvent::Unchanged);
        }
        let lines = self
            .lines
            .iter()
            .filter(|l| &l.product_id != product_id)
            .cloned()
            .collect();
        (self.with_lines(lines), CartEvent::Removed)
    }

    fn clear(&self) -> (CartState, CartEvent) {
        let event = if self.is_empty() {
            CartEvent::Unchanged
        } else {
            CartEvent::Cleared
        };
        (self.with_lines(Vec::new()), event)
    }

    fn settle(&self, submitted: &CartSnapshot) -> (CartState, CartEvent) {
        let lines = self
            .lines
            .iter()
            .filter_map(|line| {
                let paid = submitted
                    .state
                    .line(&line.product_id)
                    .filter(|l| l.generation == line.generation)
                    .map_or(0, |l| l.quantity);
                let remaining = line.quantity.saturating_sub(paid);
                (remaining > 0).then(|| CartLine {
                    quantity: remaining,
                    ..line.clone()
                })
            })
            .collect();
        (self.with_lines(lines), CartEvent::Settled)
    }

    fn with_lines(&self, lines: Vec<CartLine>) -> CartState {
        CartState {
            lines,
            next_generation: self.next_generation,
        }
    }
}

/// An immutable copy of the cart taken at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    state: CartState,
    taken_at: DateTime<Utc>,
}

impl CartSnapshot {
    /// Capture a state now.
    pub fn capture(state: &CartState) -> Self {
        Self {
            state: state.clone(),
            taken_at: Utc::now(),
        }
    }

    /// When the snapshot was taken.
    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Lines in the snapshot.
    pub fn lines(&self) -> &[CartLine] {
        self.state.lines()
    }

    /// The captured state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Whether the snapshot has no lines.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Total units in the snapshot.
    pub fn item_count(&self) -> i64 {
        self.state.item_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn line(id: &str, quantity: i64) -> CartLine {
        CartLine::new(
            ProductId::new(id),
            format!("Product {}", id),
            Money::new(1000),
            quantity,
        )
    }

    fn add(id: &str, quantity: i64) -> CartCommand {
        CartCommand::AddItem {
            line: line(id, quantity),
            stock_limit: None,
        }
    }

    fn apply(state: &CartState, command: CartCommand) -> CartState {
        state.reduce(command).unwrap().0
    }

    #[test]
    fn test_add_twice_merges() {
        let state = apply(&CartState::new(), add("p1", 1));
        let (state, event) = state.reduce(add("p1", 1)).unwrap();
        assert_eq!(event, CartEvent::Merged);
        assert_eq!(state.len(), 1);
        assert_eq!(state.quantity_of(&ProductId::new("p1")), 2);
    }

    #[test]
    fn test_reduce_is_pure() {
        let state = apply(&CartState::new(), add("p1", 1));
        let _ = state.reduce(CartCommand::Clear).unwrap();
        assert_eq!(state.quantity_of(&ProductId::new("p1")), 1);
    }

    #[test]
    fn test_no_duplicate_lines_under_mixed_sequence() {
        let commands = vec![
            add("p1", 1),
            add("p2", 2),
            add("p1", 3),
            CartCommand::RemoveItem {
                product_id: ProductId::new("p2"),
            },
            add("p2", 1),
            add("p3", 1),
            add("p2", 4),
            CartCommand::RemoveItem {
                product_id: ProductId::new("p9"),
            },
            add("p1", 1),
        ];

        let mut state = CartState::new();
        for command in commands {
            state = apply(&state, command);
            let mut ids: Vec<_> = state.lines().iter().map(|l| l.product_id.clone()).collect();
            let before = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), before);
            assert!(state.lines().iter().all(|l| l.quantity >= 1));
        }

        assert_eq!(state.quantity_of(&ProductId::new("p1")), 5);
        assert_eq!(state.quantity_of(&ProductId::new("p2")), 5);
        assert_eq!(state.item_count(), 11);
    }

    #[test]
    fn test_non_positive_quantity_is_an_error() {
        let state = CartState::new();
        assert_eq!(
            state.reduce(add("p1", 0)).unwrap_err(),
            CommerceError::InvalidQuantity(0)
        );
        assert!(state.reduce(add("p1", -2)).is_err());
    }

    #[test]
    fn test_stock_limit_rejects_without_error() {
        let state = apply(
            &CartState::new(),
            CartCommand::AddItem {
                line: line("p1", 3),
                stock_limit: Some(3),
            },
        );

        let (next, event) = state
            .reduce(CartCommand::AddItem {
                line: line("p1", 1),
                stock_limit: Some(3),
            })
            .unwrap();

        assert_eq!(event, CartEvent::Rejected { available: 0 });
        assert!(!event.changed());
        assert_eq!(next.quantity_of(&ProductId::new("p1")), 3);
    }

    #[test]
    fn test_quantity_ceiling() {
        let result = CartState::new().reduce(add("p1", MAX_QUANTITY_PER_ITEM + 1));
        assert!(matches!(result, Err(CommerceError::QuantityExceedsLimit(_, _))));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let state = apply(&CartState::new(), add("p1", 2));
        let (next, event) = state
            .reduce(CartCommand::RemoveItem {
                product_id: ProductId::new("nope"),
            })
            .unwrap();
        assert_eq!(event, CartEvent::Unchanged);
        assert_eq!(next, state);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let state = apply(&apply(&CartState::new(), add("p1", 2)), add("p2", 1));
        let (once, event) = state.reduce(CartCommand::Clear).unwrap();
        assert_eq!(event, CartEvent::Cleared);
        let (twice, event) = once.reduce(CartCommand::Clear).unwrap();
        assert_eq!(event, CartEvent::Unchanged);
        assert_eq!(once, twice);
        assert_eq!(twice.mode(), CartMode::Empty);
    }

    #[test]
    fn test_settle_matching_snapshot_empties_cart() {
        let state = apply(&apply(&CartState::new(), add("p1", 2)), add("p2", 1));
        let snapshot = CartSnapshot::capture(&state);
        let next = apply(&state, CartCommand::Settle { submitted: snapshot });
        assert!(next.is_empty());
    }

    #[test]
    fn test_settle_keeps_items_added_after_snapshot() {
        let state = apply(&CartState::new(), add("p1", 2));
        let snapshot = CartSnapshot::capture(&state);

        let state = apply(&state, add("p1", 1));
        let state = apply(&state, add("p2", 4));

        let next = apply(&state, CartCommand::Settle { submitted: snapshot });
        assert_eq!(next.quantity_of(&ProductId::new("p1")), 1);
        assert_eq!(next.quantity_of(&ProductId::new("p2")), 4);
    }

    #[test]
    fn test_settle_after_removal_does_not_resurrect() {
        let state = apply(&CartState::new(), add("p1", 2));
        let snapshot = CartSnapshot::capture(&state);
        let state = apply(
            &state,
            CartCommand::RemoveItem {
                product_id: ProductId::new("p1"),
            },
        );
        let next = apply(&state, CartCommand::Settle { submitted: snapshot });
        assert!(next.is_empty());
    }

    #[test]
    fn test_settle_keeps_line_re_added_after_clear() {
        let state = apply(&CartState::new(), add("p1", 2));
        let snapshot = CartSnapshot::capture(&state);

        let state = apply(&state, CartCommand::Clear);
        let state = apply(&state, add("p1", 2));

        let next = apply(&state, CartCommand::Settle { submitted: snapshot });
        assert_eq!(next.quantity_of(&ProductId::new("p1")), 2);
    }

    #[test]
    fn test_settle_keeps_line_re_added_after_removal() {
        let state = apply(&apply(&CartState::new(), add("p1", 3)), add("p2", 1));
        let snapshot = CartSnapshot::capture(&state);

        let state = apply(
            &state,
            CartCommand::RemoveItem {
                product_id: ProductId::new("p1"),
            },
        );
        let state = apply(&state, add("p1", 1));

        let next = apply(&state, CartCommand::Settle { submitted: snapshot });
        assert_eq!(next.quantity_of(&ProductId::new("p1")), 1);
        assert_eq!(next.quantity_of(&ProductId::new("p2")), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_rejected_available_saturates() {
        let state = apply(&CartState::new(), add("p1", 5));
        let (_, event) = state
            .reduce(CartCommand::AddItem {
                line: line("p1", 1),
                stock_limit: Some(i64::MIN),
            })
            .unwrap();
        assert_eq!(event, CartEvent::Rejected { available: i64::MIN });
    }
}
