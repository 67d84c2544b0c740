//! Personalized recommendations route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::flows::recommendations::{
    PersonalizedRecommendationsInput, personalized_recommendations,
};
use crate::state::AppState;

/// Recommendations request.
#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    /// Past purchases and browsing activity as free text.
    pub user_history: String,
}

/// Recommendations response.
#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<String>,
}

/// Generate personalized recommendations over the reconciled catalog.
///
/// Unlike the assistant, failures here propagate to the client (as an AI
/// service error) once the flow's own retry budget is spent.
#[instrument(skip(state, request))]
pub async fn index(
    State(state): State<AppState>,
    Json(request): Json<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>> {
    let products = state.catalog().products(None).await;
    let product_catalog =
        serde_json::to_string(&products).unwrap_or_else(|_| "[]".to_string());

    let input = PersonalizedRecommendationsInput {
        user_history: request.user_history,
        product_catalog,
    };

    let output = personalized_recommendations(state.model(), &input).await?;

    Ok(Json(RecommendationsResponse {
        recommendations: output.recommendations,
    }))
}
