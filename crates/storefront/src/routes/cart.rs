//! Cart route handlers.
//!
//! The cart is a session-scoped multiset of products: adding the same
//! product twice yields two lines, and removal drops every line with the
//! given id. Checkout converts the cart into a persisted order and clears
//! it only after the write succeeds.

use axum::{Json, extract::State};
use cartwheel_core::{Order, Product, ShippingAddress};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::flows::smart_cart::{
    SmartCartSuggestionsInput, resolve_suggested_products, smart_cart_suggestions,
    split_suggestions,
};
use crate::models::session::{keys, require_user};
use crate::services::checkout::place_order;
use crate::state::AppState;

/// Cart contents with totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<Product>,
    pub subtotal: Decimal,
    pub item_count: usize,
}

impl CartView {
    fn from_items(items: Vec<Product>) -> Self {
        let subtotal = items.iter().map(|p| p.price).sum();
        let item_count = items.len();
        Self {
            items,
            subtotal,
            item_count,
        }
    }
}

/// Form naming a product by id.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub product_id: String,
}

/// Checkout request.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping_address: ShippingAddress,
}

/// Checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub success: bool,
    pub order: Order,
}

/// Smart-cart suggestions request.
#[derive(Debug, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default)]
    pub purchase_history: Vec<String>,
    #[serde(default)]
    pub browsing_history: Vec<String>,
}

/// Smart-cart suggestions response.
#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Product>,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session.
async fn get_cart(session: &Session) -> Vec<Product> {
    session
        .get::<Vec<Product>>(keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the cart in the session.
async fn set_cart(session: &Session, cart: &[Product]) -> Result<()> {
    session.insert(keys::CART, cart).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Show the cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    Json(CartView::from_items(get_cart(&session).await))
}

/// Add a product to the cart.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<CartItemForm>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .product(&form.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut cart = get_cart(&session).await;
    cart.push(product);
    set_cart(&session, &cart).await?;

    Ok(Json(CartView::from_items(cart)))
}

/// Remove every cart line with the given product id.
#[instrument(skip(session))]
pub async fn remove(session: Session, Json(form): Json<CartItemForm>) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.retain(|product| product.id != form.product_id);
    set_cart(&session, &cart).await?;

    Ok(Json(CartView::from_items(cart)))
}

/// Convert the cart into an order.
///
/// The cart is cleared only after the order has been persisted; any
/// failure leaves the cart intact.
#[instrument(skip(state, session, request))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let user = require_user(&session).await?;

    let store = state.store().ok_or_else(|| {
        AppError::ServiceUnavailable("Checkout is currently unavailable".to_string())
    })?;

    let cart = get_cart(&session).await;
    let order = place_order(store.as_ref(), &user.id, &cart, request.shipping_address).await?;

    set_cart(&session, &[]).await?;

    Ok(Json(CheckoutResponse {
        success: true,
        order,
    }))
}

/// AI smart-cart suggestions.
///
/// Degrades to an empty suggestion list on any model or store failure.
#[instrument(skip(state, request))]
pub async fn suggestions(
    State(state): State<AppState>,
    Json(request): Json<SuggestionsRequest>,
) -> Json<SuggestionsResponse> {
    let input = SmartCartSuggestionsInput {
        purchase_history: request.purchase_history.join(", "),
        browsing_history: request.browsing_history.join(", "),
    };

    let output = match smart_cart_suggestions(state.model(), &input).await {
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "Smart-cart suggestions failed");
            return Json(SuggestionsResponse {
                suggestions: Vec::new(),
            });
        }
    };

    let names = split_suggestions(&output.suggested_items);
    if names.is_empty() {
        return Json(SuggestionsResponse {
            suggestions: Vec::new(),
        });
    }

    let Some(store) = state.store() else {
        return Json(SuggestionsResponse {
            suggestions: Vec::new(),
        });
    };

    let suggestions = match resolve_suggested_products(store.as_ref(), &names).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to resolve suggested products");
            Vec::new()
        }
    };

    Json(SuggestionsResponse { suggestions })
}
