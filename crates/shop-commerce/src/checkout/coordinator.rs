//! Checkout coordinator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock};

use tracing::{info, warn};

use crate::cart::{CartSnapshot, CartStore};
use crate::checkout::{CheckoutResult, CreateOrderRequest, OrderGateway};
use crate::error::CommerceError;

/// Submits the cart as an order and reconciles the cart with the answer.
///
/// The cart stays mutable while a checkout is pending. The order is built
/// from a snapshot taken when [`checkout`](Self::checkout) is called, and on
/// success exactly the submitted quantities are removed from the cart.
pub struct CheckoutCoordinator<G> {
    store: CartStore,
    gateway: G,
    in_flight: AtomicBool,
    result: RwLock<CheckoutResult>,
}

impl<G: OrderGateway> CheckoutCoordinator<G> {
    pub fn new(store: CartStore, gateway: G) -> Self {
        Self {
            store,
            gateway,
            in_flight: AtomicBool::new(false),
            result: RwLock::new(CheckoutResult::Idle),
        }
    }

    /// Place an order for the current cart contents.
    ///
    /// Submits once. On failure the cart is left as it was and the
    /// result holds a message for the user.
    pub async fn checkout(&self) -> Result<(), CommerceError> {
        let _guard = InFlight::acquire(self)?;

        let snapshot = self.store.snapshot();
        if snapshot.is_empty() {
            let err = CommerceError::EmptyCart;
            self.set_result(CheckoutResult::Error {
                message: err.user_message(),
            });
            return Err(err);
        }

        self.set_result(CheckoutResult::Pending);
        let request = CreateOrderRequest::from(&snapshot);
        info!(
            lines = request.items.len(),
            items = snapshot.item_count(),
            "submitting order"
        );

        match self.gateway.create_order(&request).await {
            Ok(()) => self.complete(&snapshot),
            Err(err) => {
                warn!(error = %err, "checkout failed, cart left intact");
                self.set_result(CheckoutResult::Error {
                    message: err.user_message(),
                });
                Err(err)
            }
        }
    }

    fn complete(&self, snapshot: &CartSnapshot) -> Result<(), CommerceError> {
        self.store.settle(snapshot)?;
        self.set_result(CheckoutResult::Success);
        info!(remaining = self.store.item_count(), "order placed");
        Ok(())
    }

    /// Outcome of the last attempt.
    pub fn result(&self) -> CheckoutResult {
        self.result
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hide a finished result. A pending checkout is not affected.
    pub fn dismiss(&self) {
        let mut result = self.result.write().unwrap_or_else(PoisonError::into_inner);
        if !result.is_pending() {
            *result = CheckoutResult::Idle;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn set_result(&self, next: CheckoutResult) {
        *self.result.write().unwrap_or_else(PoisonError::into_inner) = next;
    }
}

/// Marks a checkout as running until dropped.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    result: &'a RwLock<CheckoutResult>,
}

impl<'a> InFlight<'a> {
    fn acquire<G>(coordinator: &'a CheckoutCoordinator<G>) -> Result<Self, CommerceError> {
        coordinator
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CommerceError::CheckoutInProgress)?;
        Ok(Self {
            flag: &coordinator.in_flight,
            result: &coordinator.result,
        })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        // the future was dropped mid-request
        let mut result = self.result.write().unwrap_or_else(PoisonError::into_inner);
        if result.is_pending() {
            *result = CheckoutResult::Idle;
        }
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::money::Money;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    /// Records requests and answers with a canned outcome.
    #[derive(Default)]
    struct MockGateway {
        calls: AtomicUsize,
        requests: Mutex<Vec<CreateOrderRequest>>,
        failure: Option<CommerceError>,
    }

    impl MockGateway {
        fn failing(err: CommerceError) -> Self {
            Self {
                failure: Some(err),
                ..Default::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderGateway for MockGateway {
        async fn create_order(&self, request: &CreateOrderRequest) -> Result<(), CommerceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            match &self.failure {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    /// Holds every request until released.
    #[derive(Default)]
    struct GatedGateway {
        entered: Notify,
        release: Notify,
    }

    #[async_trait]
    impl OrderGateway for GatedGateway {
        async fn create_order(&self, _request: &CreateOrderRequest) -> Result<(), CommerceError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(())
        }
    }

    fn product(id: &str) -> Product {
        Product::new(id, format!("Product {}", id), Money::new(1000), 10)
    }

    #[tokio::test]
    async fn test_empty_cart_makes_no_call() {
        let coordinator = CheckoutCoordinator::new(CartStore::new(), MockGateway::default());

        let err = coordinator.checkout().await.unwrap_err();
        assert_eq!(err, CommerceError::EmptyCart);
        assert_eq!(coordinator.gateway().calls(), 0);
        assert_eq!(coordinator.result().as_str(), "error");
        assert!(!coordinator.is_pending());
    }

    #[tokio::test]
    async fn test_success_empties_cart() {
        let store = CartStore::new();
        store.add_item(&product("p1"), 2).unwrap();
        let coordinator = CheckoutCoordinator::new(store.clone(), MockGateway::default());

        coordinator.checkout().await.unwrap();

        assert!(store.is_empty());
        assert_eq!(coordinator.result(), CheckoutResult::Success);
        let requests = coordinator.gateway().requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_rejection_leaves_cart_intact() {
        let store = CartStore::new();
        store.add_item(&product("p1"), 1).unwrap();
        let before = store.state();
        let coordinator = CheckoutCoordinator::new(
            store.clone(),
            MockGateway::failing(CommerceError::CheckoutRejected {
                status: Some(500),
                message: Some("out of stock".to_string()),
            }),
        );

        assert!(coordinator.checkout().await.is_err());

        assert_eq!(store.state(), before);
        assert_eq!(
            coordinator.result(),
            CheckoutResult::Error {
                message: "out of stock".to_string()
            }
        );
        assert_eq!(coordinator.gateway().calls(), 1);
    }

    #[tokio::test]
    async fn test_network_failure_has_generic_message() {
        let store = CartStore::new();
        store.add_item(&product("p1"), 1).unwrap();
        let coordinator = CheckoutCoordinator::new(
            store.clone(),
            MockGateway::failing(CommerceError::NetworkUnavailable("connection refused".into())),
        );

        let err = coordinator.checkout().await.unwrap_err();
        assert!(matches!(err, CommerceError::NetworkUnavailable(_)));
        assert_eq!(coordinator.result().message(), Some("Failed to create order"));
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_resets_result() {
        let coordinator = CheckoutCoordinator::new(CartStore::new(), MockGateway::default());
        let _ = coordinator.checkout().await;
        coordinator.dismiss();
        assert_eq!(coordinator.result(), CheckoutResult::Idle);
    }

    #[tokio::test]
    async fn test_concurrent_checkout_rejected_and_late_adds_survive() {
        let store = CartStore::new();
        store.add_item(&product("p1"), 2).unwrap();
        let gateway = Arc::new(GatedGateway::default());
        let coordinator = Arc::new(CheckoutCoordinator::new(store.clone(), gateway.clone()));

        let running = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.checkout().await }
        });
        gateway.entered.notified().await;

        assert!(coordinator.is_pending());
        assert_eq!(coordinator.result(), CheckoutResult::Pending);
        assert_eq!(
            coordinator.checkout().await.unwrap_err(),
            CommerceError::CheckoutInProgress
        );

        // the cart stays usable while the order is in flight
        store.add_item(&product("p1"), 1).unwrap();
        store.add_item(&product("p2"), 3).unwrap();

        gateway.release.notify_one();
        running.await.unwrap().unwrap();

        assert_eq!(coordinator.result(), CheckoutResult::Success);
        assert!(!coordinator.is_pending());
        assert_eq!(store.current_quantity(&"p1".into()), 1);
        assert_eq!(store.current_quantity(&"p2".into()), 3);
    }

    #[tokio::test]
    async fn test_cart_cleared_and_refilled_in_flight_survives() {
        let store = CartStore::new();
        store.add_item(&product("p1"), 2).unwrap();
        let gateway = Arc::new(GatedGateway::default());
        let coordinator = Arc::new(CheckoutCoordinator::new(store.clone(), gateway.clone()));

        let running = tokio::spawn({
            let coordinator = coordinator.clone();
            async move { coordinator.checkout().await }
        });
        gateway.entered.notified().await;

        store.clear().unwrap();
        store.add_item(&product("p1"), 2).unwrap();

        gateway.release.notify_one();
        running.await.unwrap().unwrap();

        assert_eq!(coordinator.result(), CheckoutResult::Success);
        assert_eq!(store.current_quantity(&"p1".into()), 2);
    }
}
