//! Wishlist route handlers.
//!
//! The wishlist is a session-scoped set keyed by product id: adding a
//! product that is already present is a no-op.

use axum::{Json, extract::State};
use cartwheel_core::Product;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session::keys;
use crate::state::AppState;

/// Wishlist contents.
#[derive(Debug, Serialize)]
pub struct WishlistView {
    pub items: Vec<Product>,
    pub item_count: usize,
}

impl WishlistView {
    fn from_items(items: Vec<Product>) -> Self {
        let item_count = items.len();
        Self { items, item_count }
    }
}

/// Form naming a product by id.
#[derive(Debug, Deserialize)]
pub struct WishlistItemForm {
    pub product_id: String,
}

/// Get the wishlist from the session.
async fn get_wishlist(session: &Session) -> Vec<Product> {
    session
        .get::<Vec<Product>>(keys::WISHLIST)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Store the wishlist in the session.
async fn set_wishlist(session: &Session, wishlist: &[Product]) -> Result<()> {
    session.insert(keys::WISHLIST, wishlist).await?;
    Ok(())
}

/// Show the wishlist.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<WishlistView> {
    Json(WishlistView::from_items(get_wishlist(&session).await))
}

/// Add a product to the wishlist (idempotent by id).
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<WishlistItemForm>,
) -> Result<Json<WishlistView>> {
    let product = state
        .catalog()
        .product(&form.product_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;

    let mut wishlist = get_wishlist(&session).await;
    if !wishlist.iter().any(|item| item.id == product.id) {
        wishlist.push(product);
        set_wishlist(&session, &wishlist).await?;
    }

    Ok(Json(WishlistView::from_items(wishlist)))
}

/// Remove a product from the wishlist.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(form): Json<WishlistItemForm>,
) -> Result<Json<WishlistView>> {
    let mut wishlist = get_wishlist(&session).await;
    wishlist.retain(|item| item.id != form.product_id);
    set_wishlist(&session, &wishlist).await?;

    Ok(Json(WishlistView::from_items(wishlist)))
}
