//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use cartwheel_core::{Category, Product, UserRole};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::models::session::require_user;
use crate::state::AppState;
use crate::store::{collections, encode};

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive category filter.
    pub category: Option<String>,
}

/// Product listing response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
}

/// New product submission (sellers only).
#[derive(Debug, Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: Category,
    pub image: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub try_on_available: bool,
}

/// Response for a created product.
#[derive(Debug, Serialize)]
pub struct CreateProductResponse {
    pub success: bool,
    pub product: Product,
}

/// List the reconciled catalog, optionally filtered by category.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let filter = match query.category.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<Category>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
        ),
    };

    Ok(Json(ProductListResponse {
        products: state.catalog().products(filter).await,
    }))
}

/// Show one product by id.
#[instrument(skip(state), fields(id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    state
        .catalog()
        .product(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// List products eligible for virtual try-on.
#[instrument(skip(state))]
pub async fn try_on_index(State(state): State<AppState>) -> Json<ProductListResponse> {
    Json(ProductListResponse {
        products: state.catalog().try_on_products().await,
    })
}

/// List a new product (sellers only).
///
/// The product starts with no rating or reviews and is owned by the
/// signed-in seller.
#[instrument(skip(state, session, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<NewProductRequest>,
) -> Result<Json<CreateProductResponse>> {
    let user = require_user(&session).await?;
    if user.role != UserRole::Seller {
        return Err(AppError::Forbidden(
            "Only seller accounts can list products".to_string(),
        ));
    }

    let store = state.store().ok_or_else(|| {
        AppError::ServiceUnavailable("Product listings are currently unavailable".to_string())
    })?;

    let mut product = Product {
        id: String::new(),
        name: form.name,
        price: form.price,
        description: form.description,
        category: form.category,
        image: form.image,
        features: form.features,
        rating: 0.0,
        reviews: 0,
        try_on_available: form.try_on_available,
        seller_id: Some(user.id),
    };

    let fields = encode(&product).map_err(AppError::Store)?;
    product.id = store.create(collections::PRODUCTS, fields).await.map_err(AppError::Store)?;

    Ok(Json(CreateProductResponse {
        success: true,
        product,
    }))
}
