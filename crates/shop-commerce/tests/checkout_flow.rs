//! Storefront checkout against a loopback order service.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use shop_commerce::prelude::*;
use tokio::net::TcpListener;

type Received = Arc<Mutex<Vec<Value>>>;

async fn spawn(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn accept_order(
    State(received): State<Received>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    received.lock().unwrap().push(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({
            "id": "3f2b6c1e-0000-4000-8000-000000000001",
            "status": "created",
            "createdAt": "2024-05-01T12:00:00Z",
            "items": body["items"],
            "deleted": false
        })),
    )
}

async fn reject_order(State(received): State<Received>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    received.lock().unwrap().push(body);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": "out of stock"})),
    )
}

async fn products() -> Json<Value> {
    Json(json!([
        {"id": "p1", "name": "Coffee Mug", "description": "Ceramic", "price": 12.5, "stock": 3},
        {"id": "p2", "name": "Tea Towel", "description": "", "price": 4.99, "stock": 0}
    ]))
}

fn order_service(received: Received, accept: bool) -> Router {
    let orders = if accept {
        post(accept_order)
    } else {
        post(reject_order)
    };
    Router::new()
        .route("/api/orders", orders)
        .route("/api/products", get(products))
        .with_state(received)
}

#[tokio::test]
async fn successful_checkout_empties_the_cart() {
    let received = Received::default();
    let base = spawn(order_service(received.clone(), true)).await;

    let catalog = CatalogClient::new(&base).list_products().await.unwrap();
    let mug = catalog.require(&"p1".into()).unwrap();

    let store = CartStore::new();
    store.add_item(mug, 1).unwrap();
    store.add_item(mug, 1).unwrap();
    assert_eq!(store.lines().len(), 1);

    let coordinator = CheckoutCoordinator::new(store.clone(), OrdersClient::new(&base));
    coordinator.checkout().await.unwrap();

    assert!(store.is_empty());
    assert_eq!(
        serde_json::to_value(coordinator.result()).unwrap(),
        json!({"status": "success"})
    );

    let bodies = received.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({"items": [{"productId": "p1", "productName": "Coffee Mug", "quantity": 2}]})
    );
}

#[tokio::test]
async fn rejected_checkout_keeps_the_cart() {
    let received = Received::default();
    let base = spawn(order_service(received.clone(), false)).await;

    let catalog = CatalogClient::new(&base).list_products().await.unwrap();
    let store = CartStore::new();
    store.add_item(catalog.require(&"p1".into()).unwrap(), 1).unwrap();
    let before = store.state();

    let coordinator = CheckoutCoordinator::new(store.clone(), OrdersClient::new(&base));
    let err = coordinator.checkout().await.unwrap_err();

    assert_eq!(
        err,
        CommerceError::CheckoutRejected {
            status: Some(500),
            message: Some("out of stock".to_string()),
        }
    );
    assert_eq!(store.state(), before);
    assert_eq!(
        serde_json::to_value(coordinator.result()).unwrap(),
        json!({"status": "error", "message": "out of stock"})
    );
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn out_of_stock_product_cannot_be_added() {
    let base = spawn(order_service(Received::default(), true)).await;
    let catalog = CatalogClient::new(&base).list_products().await.unwrap();
    let towel = catalog.require(&"p2".into()).unwrap();

    let store = CartStore::new();
    assert!(!store.can_add(towel));
    assert_eq!(
        store.add_item(towel, 1).unwrap(),
        CartEvent::Rejected { available: 0 }
    );
    assert!(store.is_empty());
}

#[tokio::test]
async fn unreachable_order_service_is_reported_generically() {
    let store = CartStore::new();
    store
        .add_item(&Product::new("p1", "Mug", Money::new(100), 5), 1)
        .unwrap();

    // nothing listens on port 9 of loopback
    let coordinator = CheckoutCoordinator::new(store.clone(), OrdersClient::new("http://127.0.0.1:9"));
    let err = coordinator.checkout().await.unwrap_err();

    assert!(matches!(err, CommerceError::NetworkUnavailable(_)));
    assert_eq!(coordinator.result().message(), Some("Failed to create order"));
    assert_eq!(store.item_count(), 1);
}
