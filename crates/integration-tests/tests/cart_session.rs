//! Router-level tests for session cart state and checkout discipline.
//!
//! These drive the real axum router with the session layer attached,
//! carrying the session cookie between requests the way a browser would.
//! The key property: the cart survives a failed checkout untouched and is
//! emptied only after the order has actually been persisted.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use cartwheel_integration_tests::{InMemoryStore, ScriptedModel};
use cartwheel_storefront::config::{ModelConfig, StorefrontConfig};
use cartwheel_storefront::state::AppState;
use cartwheel_storefront::store::{
    Document, DocumentStore, FieldClause, StoreError, collections,
};
use cartwheel_storefront::{middleware, routes};

/// Delegates to an in-memory store but fails order creation on demand.
struct FlakyOrderStore {
    inner: InMemoryStore,
    fail_orders: AtomicBool,
}

impl FlakyOrderStore {
    fn new() -> Self {
        Self {
            inner: InMemoryStore::new(),
            fail_orders: AtomicBool::new(true),
        }
    }

    fn heal(&self) {
        self.fail_orders.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl DocumentStore for FlakyOrderStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(collection, id).await
    }

    async fn query_eq(
        &self,
        collection: &str,
        clauses: &[FieldClause],
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query_eq(collection, clauses).await
    }

    async fn create(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<String, StoreError> {
        if collection == collections::ORDERS && self.fail_orders.load(Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 500,
                message: "order write failed".to_string(),
            });
        }
        self.inner.create(collection, fields).await
    }
}

fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().expect("ip"),
        port: 0,
        model: ModelConfig {
            api_key: SecretString::from("k9!mX2@pQ7&vB4^"),
            model: "test-model".to_string(),
            image_model: "test-image-model".to_string(),
            base_url: "http://localhost".to_string(),
        },
        docstore: None,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

fn app(store: Option<Arc<dyn DocumentStore>>) -> Router {
    let state = AppState::with_collaborators(
        test_config(),
        store,
        Arc::new(ScriptedModel::default()),
    );

    Router::new()
        .merge(routes::routes())
        .layer(middleware::create_session_layer())
        .with_state(state)
}

/// Send one request, returning (status, set-cookie, parsed JSON body).
async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Option<String>, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(ToString::to_string);

    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };

    (status, set_cookie, body)
}

async fn sign_up(app: &Router) -> String {
    let (status, cookie, _) = send(
        app,
        "POST",
        "/auth/signup",
        None,
        Some(json!({
            "email": "shopper@example.com",
            "password": "a-long-password",
            "first_name": "Alex",
            "last_name": "Doe"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    cookie.expect("signup sets the session cookie")
}

#[tokio::test]
async fn test_cart_survives_failed_checkout_and_clears_on_success() {
    let store = Arc::new(FlakyOrderStore::new());
    let app = app(Some(store.clone()));
    let cookie = sign_up(&app).await;

    // Add a bundled product to the cart.
    let (status, _, cart) = send(
        &app,
        "POST",
        "/cart/add",
        Some(&cookie),
        Some(json!({"product_id": "product-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["item_count"], 1);

    let checkout_body = json!({
        "shipping_address": {
            "street": "123 Main St",
            "city": "Anytown",
            "state": "CA",
            "zip_code": "12345",
            "country": "USA"
        }
    });

    // Checkout fails while the order write is broken; the cart is intact.
    let (status, _, body) = send(
        &app,
        "POST",
        "/cart/checkout",
        Some(&cookie),
        Some(checkout_body.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);

    let (_, _, cart) = send(&app, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(cart["item_count"], 1, "failed checkout must not clear the cart");

    // Heal the store; the same checkout now succeeds and empties the cart.
    store.heal();
    let (status, _, body) = send(
        &app,
        "POST",
        "/cart/checkout",
        Some(&cookie),
        Some(checkout_body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["order"]["status"], "pending");
    assert_eq!(body["order"]["total_amount"], "90.00");

    let (_, _, cart) = send(&app, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(cart["item_count"], 0, "successful checkout clears the cart");
}

#[tokio::test]
async fn test_checkout_with_empty_cart_is_rejected() {
    let store = Arc::new(FlakyOrderStore::new());
    store.heal();
    let app = app(Some(store));
    let cookie = sign_up(&app).await;

    let (status, _, body) = send(
        &app,
        "POST",
        "/cart/checkout",
        Some(&cookie),
        Some(json!({
            "shipping_address": {
                "street": "123 Main St",
                "city": "Anytown",
                "state": "CA",
                "zip_code": "12345",
                "country": "USA"
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_checkout_requires_a_signed_in_user() {
    let app = app(None);

    let (status, _, _) = send(
        &app,
        "POST",
        "/cart/checkout",
        None,
        Some(json!({
            "shipping_address": {
                "street": "123 Main St",
                "city": "Anytown",
                "state": "CA",
                "zip_code": "12345",
                "country": "USA"
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wishlist_add_is_idempotent_by_id() {
    let app = app(None);

    let (_, cookie, wishlist) = send(
        &app,
        "POST",
        "/wishlist/add",
        None,
        Some(json!({"product_id": "product-1"})),
    )
    .await;
    assert_eq!(wishlist["item_count"], 1);
    let cookie = cookie.expect("wishlist write sets the session cookie");

    let (_, _, wishlist) = send(
        &app,
        "POST",
        "/wishlist/add",
        Some(&cookie),
        Some(json!({"product_id": "product-1"})),
    )
    .await;
    assert_eq!(wishlist["item_count"], 1, "duplicate add is a no-op");

    let (_, _, cart) = send(
        &app,
        "POST",
        "/cart/add",
        Some(&cookie),
        Some(json!({"product_id": "product-1"})),
    )
    .await;
    let (_, _, cart_again) = send(
        &app,
        "POST",
        "/cart/add",
        Some(&cookie),
        Some(json!({"product_id": "product-1"})),
    )
    .await;
    assert_eq!(cart["item_count"], 1);
    assert_eq!(cart_again["item_count"], 2, "cart allows duplicate lines");
}
