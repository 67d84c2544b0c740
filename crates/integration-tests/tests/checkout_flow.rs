//! Integration tests for checkout and order history.

use cartwheel_core::{Category, OrderStatus, ShippingAddress};
use cartwheel_integration_tests::{FailingStore, InMemoryStore, product};
use cartwheel_storefront::services::checkout::{orders_for_user, place_order};
use cartwheel_storefront::store::collections;
use chrono::Duration;
use rust_decimal::Decimal;

fn address() -> ShippingAddress {
    ShippingAddress {
        street: "123 Main St".to_string(),
        city: "Anytown".to_string(),
        state: "CA".to_string(),
        zip_code: "12345".to_string(),
        country: "USA".to_string(),
    }
}

#[tokio::test]
async fn test_two_item_cart_produces_the_expected_order() {
    let store = InMemoryStore::new();
    let cart = [
        product("Wool Beanie", Category::Apparel, 20_00),
        product("Radiant Glow Face Serum", Category::Beauty, 30_00),
    ];

    let order = place_order(&store, "user-1", &cart, address())
        .await
        .expect("place order");

    assert_eq!(order.total_amount, Decimal::new(50_00, 2));
    assert_eq!(order.items.len(), 2);
    assert!(order.items.iter().all(|item| item.quantity == 1));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(
        order.delivery_date.expect("delivery date"),
        order.order_date + Duration::days(7)
    );

    // Persisted exactly once, payload without an id field.
    let documents = store.documents_in(collections::ORDERS);
    assert_eq!(documents.len(), 1);
    let stored = documents.first().expect("document");
    assert_eq!(order.id, stored.id);
    assert!(stored.fields.get("id").is_none());
}

#[tokio::test]
async fn test_failed_persistence_writes_nothing() {
    let cart = [product("Wool Beanie", Category::Apparel, 20_00)];

    let result = place_order(&FailingStore, "user-1", &cart, address()).await;

    // The caller keeps the cart when this errors; nothing was persisted
    // and no partial order state exists anywhere.
    assert!(result.is_err());
}

#[tokio::test]
async fn test_order_history_round_trip() {
    let store = InMemoryStore::new();
    let cart = [product("Wool Beanie", Category::Apparel, 20_00)];

    let placed = place_order(&store, "user-1", &cart, address())
        .await
        .expect("place order");
    place_order(&store, "someone-else", &cart, address())
        .await
        .expect("other order");

    let history = orders_for_user(&store, "user-1").await.expect("history");

    assert_eq!(history.len(), 1);
    let order = history.first().expect("order");
    assert_eq!(order.id, placed.id);
    assert_eq!(order.total_amount, placed.total_amount);
    assert_eq!(order.items, placed.items);
}
