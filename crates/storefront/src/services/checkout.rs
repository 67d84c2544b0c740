//! Checkout and order creation.
//!
//! Converts the session cart into an immutable order and persists it to
//! the `orders` collection. The cart is only cleared by the caller after
//! persistence succeeds; on failure no partial order state is retained.

use cartwheel_core::{Order, OrderItem, OrderStatus, Product, ShippingAddress};
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{info, instrument};

use crate::store::{DocumentStore, FieldClause, StoreError, collections, encode};

/// Fixed delivery estimate applied to every order.
const DELIVERY_WINDOW_DAYS: i64 = 7;

/// Errors raised at checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout with an empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// Persisting the order failed; the cart is untouched.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Build an order from cart contents.
///
/// Every cart line becomes one [`OrderItem`] with quantity fixed at 1 and
/// line total equal to the unit price; the order total is the sum of line
/// totals. Status starts as `Pending` and the delivery estimate is
/// `now + 7 days`. The id is left empty for the store to assign.
#[must_use]
pub fn build_order(
    user_id: &str,
    cart: &[Product],
    shipping_address: ShippingAddress,
    now: DateTime<Utc>,
) -> Order {
    let items: Vec<OrderItem> = cart
        .iter()
        .map(|product| OrderItem {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            product_image: product.image.clone(),
            price: product.price,
            quantity: 1,
            total: product.price,
        })
        .collect();

    let total_amount = items.iter().map(|item| item.total).sum();

    Order {
        id: String::new(),
        user_id: user_id.to_string(),
        items,
        total_amount,
        status: OrderStatus::Pending,
        order_date: now,
        delivery_date: Some(now + Duration::days(DELIVERY_WINDOW_DAYS)),
        shipping_address,
    }
}

/// Convert the cart into an order and persist it.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` for an empty cart and
/// `CheckoutError::Store` when persistence fails; in both cases nothing
/// has been written and the caller must keep the cart intact.
#[instrument(skip(store, cart, shipping_address), fields(user_id = %user_id, items = cart.len()))]
pub async fn place_order(
    store: &dyn DocumentStore,
    user_id: &str,
    cart: &[Product],
    shipping_address: ShippingAddress,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let mut order = build_order(user_id, cart, shipping_address, Utc::now());
    let id = store
        .create(collections::ORDERS, encode(&order)?)
        .await?;
    order.id = id;

    info!(order_id = %order.id, total = %order.total_amount, "Order placed");
    Ok(order)
}

/// List a user's orders.
///
/// # Errors
///
/// Returns `StoreError` when the query fails.
#[instrument(skip(store), fields(user_id = %user_id))]
pub async fn orders_for_user(
    store: &dyn DocumentStore,
    user_id: &str,
) -> Result<Vec<Order>, StoreError> {
    let documents = store
        .query_eq(collections::ORDERS, &[FieldClause::new("user_id", user_id)])
        .await?;

    Ok(documents
        .into_iter()
        .filter_map(|document| match document.decode::<Order>() {
            Ok(order) => Some(order),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable order document");
                None
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cartwheel_core::Category;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    use crate::store::Document;

    fn product(name: &str, price_cents: i64) -> Product {
        Product {
            id: format!("product-{name}"),
            name: name.to_string(),
            price: Decimal::new(price_cents, 2),
            description: String::new(),
            category: Category::Apparel,
            image: format!("https://example.com/{name}.jpg"),
            features: vec![],
            rating: 0.0,
            reviews: 0,
            try_on_available: false,
            seller_id: None,
        }
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            street: "123 Main St".to_string(),
            city: "Anytown".to_string(),
            state: "CA".to_string(),
            zip_code: "12345".to_string(),
            country: "USA".to_string(),
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        documents: Mutex<Vec<Document>>,
        fail_creates: bool,
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn list(&self, _: &str) -> Result<Vec<Document>, StoreError> {
            Ok(self.documents.lock().expect("lock").clone())
        }

        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
            Ok(None)
        }

        async fn query_eq(
            &self,
            _: &str,
            clauses: &[FieldClause],
        ) -> Result<Vec<Document>, StoreError> {
            Ok(self
                .documents
                .lock()
                .expect("lock")
                .iter()
                .filter(|d| {
                    clauses
                        .iter()
                        .all(|c| d.fields.get(&c.field) == Some(&c.equals))
                })
                .cloned()
                .collect())
        }

        async fn create(&self, _: &str, fields: serde_json::Value) -> Result<String, StoreError> {
            if self.fail_creates {
                return Err(StoreError::Api {
                    status: 500,
                    message: "write failed".to_string(),
                });
            }
            let mut documents = self.documents.lock().expect("lock");
            let id = format!("order-{}", documents.len() + 1);
            documents.push(Document {
                id: id.clone(),
                fields,
            });
            Ok(id)
        }
    }

    #[test]
    fn test_build_order_totals_and_dates() {
        let now: DateTime<Utc> = "2026-08-01T12:00:00Z".parse().expect("timestamp");
        let cart = [product("hoodie", 20_00), product("serum", 30_00)];

        let order = build_order("user-1", &cart, address(), now);

        assert_eq!(order.items.len(), 2);
        assert!(order.items.iter().all(|item| item.quantity == 1));
        assert_eq!(order.total_amount, Decimal::new(50_00, 2));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.order_date, now);
        assert_eq!(order.delivery_date, Some(now + Duration::days(7)));
    }

    #[test]
    fn test_build_order_line_total_equals_unit_price() {
        let now = Utc::now();
        let cart = [product("hoodie", 90_00)];
        let order = build_order("user-1", &cart, address(), now);

        let item = order.items.first().expect("item");
        assert_eq!(item.total, item.price);
        assert_eq!(item.product_name, "hoodie");
        assert_eq!(item.product_image, "https://example.com/hoodie.jpg");
    }

    #[tokio::test]
    async fn test_place_order_persists_and_assigns_id() {
        let store = MemoryStore::default();
        let cart = [product("hoodie", 20_00), product("serum", 30_00)];

        let order = place_order(&store, "user-1", &cart, address())
            .await
            .expect("place order");

        assert_eq!(order.id, "order-1");
        assert_eq!(order.total_amount, Decimal::new(50_00, 2));

        // The persisted payload carries no id field.
        let documents = store.documents.lock().expect("lock");
        let stored = documents.first().expect("stored");
        assert!(stored.fields.get("id").is_none());
        assert_eq!(stored.fields["user_id"], "user-1");
    }

    #[tokio::test]
    async fn test_place_order_rejects_empty_cart() {
        let store = MemoryStore::default();
        let err = place_order(&store, "user-1", &[], address())
            .await
            .expect_err("should fail");
        assert!(matches!(err, CheckoutError::EmptyCart));
    }

    #[tokio::test]
    async fn test_place_order_surfaces_store_failure() {
        let store = MemoryStore {
            fail_creates: true,
            ..MemoryStore::default()
        };
        let cart = [product("hoodie", 20_00)];
        let err = place_order(&store, "user-1", &cart, address())
            .await
            .expect_err("should fail");
        assert!(matches!(err, CheckoutError::Store(_)));
    }

    #[tokio::test]
    async fn test_orders_for_user_filters_by_owner() {
        let store = MemoryStore::default();
        place_order(&store, "user-1", &[product("hoodie", 20_00)], address())
            .await
            .expect("order 1");
        place_order(&store, "user-2", &[product("serum", 30_00)], address())
            .await
            .expect("order 2");

        let orders = orders_for_user(&store, "user-1").await.expect("list");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders.first().expect("order").user_id, "user-1");
        assert_eq!(orders.first().expect("order").id, "order-1");
    }
}
