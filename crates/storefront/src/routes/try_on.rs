//! Virtual try-on route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::flows::try_on::{TryOnProductSummary, VirtualTryOnInput, virtual_try_on};
use crate::state::AppState;

/// Try-on result envelope.
///
/// Generation problems are part of the normal response shape rather than
/// HTTP errors: the page always gets `{success, ...}` back.
#[derive(Debug, Serialize)]
pub struct TryOnResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<TryOnProductSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Generate a virtual try-on image.
#[instrument(skip(state, input), fields(product_id = %input.product_id))]
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<VirtualTryOnInput>,
) -> Json<TryOnResponse> {
    match virtual_try_on(state.model(), state.catalog(), input).await {
        Ok(output) => Json(TryOnResponse {
            success: true,
            image: Some(output.generated_image),
            product: Some(output.product),
            message: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "Virtual try-on failed");
            Json(TryOnResponse {
                success: false,
                image: None,
                product: None,
                message: Some(e.to_string()),
            })
        }
    }
}
