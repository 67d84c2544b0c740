//! Shopping assistant route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::flows::assistant::{AskQuestionInput, AskQuestionOutput, ask_question};
use crate::state::AppState;

/// A question for the shopping assistant.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Ask the shopping assistant a question.
///
/// Always returns an answer object; the flow degrades internally on
/// failure and an empty question short-circuits to a prompt for one.
#[instrument(skip(state, request))]
pub async fn ask(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Json<AskQuestionOutput> {
    if request.question.trim().is_empty() {
        return Json(AskQuestionOutput {
            answer: "Please ask a question.".to_string(),
            recommended_products: Vec::new(),
        });
    }

    let output = ask_question(
        state.model(),
        state.catalog(),
        AskQuestionInput {
            question: request.question,
        },
    )
    .await;

    Json(output)
}
