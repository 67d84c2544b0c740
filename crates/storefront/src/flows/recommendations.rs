//! Personalized recommendations flow.
//!
//! Single structured call over the user's history and the serialized
//! catalog. Carries its own (deliberately narrow) retry policy: up to
//! three attempts with a fixed one-second delay, retrying only when the
//! error text contains exactly `503 Service Unavailable`; anything else is
//! re-thrown to the caller.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::genai::{GenerativeModel, ModelError};

const MAX_ATTEMPTS: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_secs(1);
const RETRY_MARKER: &str = "503 Service Unavailable";

/// User history plus the serialized catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonalizedRecommendationsInput {
    /// Past purchases and browsing activity as free text.
    pub user_history: String,
    /// The available products serialized as text.
    pub product_catalog: String,
}

/// Recommended product names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizedRecommendationsOutput {
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Generate personalized product recommendations.
///
/// # Errors
///
/// Returns the model error unchanged when it is not a transient overload,
/// or when the overload persists through the final attempt.
#[instrument(skip(model, input))]
pub async fn personalized_recommendations(
    model: &dyn GenerativeModel,
    input: &PersonalizedRecommendationsInput,
) -> Result<PersonalizedRecommendationsOutput, ModelError> {
    let prompt = build_prompt(input);

    let mut retries = MAX_ATTEMPTS;
    while retries > 0 {
        match model.generate_json(prompt.clone(), output_schema()).await {
            Ok(value) => {
                return serde_json::from_value(value)
                    .map_err(|e| ModelError::Parse(e.to_string()));
            }
            Err(e) => {
                if e.to_string().contains(RETRY_MARKER) && retries > 1 {
                    info!("Model overloaded, retrying...");
                    retries -= 1;
                    tokio::time::sleep(RETRY_DELAY).await;
                } else {
                    return Err(e);
                }
            }
        }
    }

    // The final attempt always returns from the loop above; empty
    // recommendations remain as a safety net.
    Ok(PersonalizedRecommendationsOutput {
        recommendations: Vec::new(),
    })
}

fn build_prompt(input: &PersonalizedRecommendationsInput) -> String {
    format!(
        r"You are an expert shopping assistant specializing in product recommendations.

Based on the user's past shopping history and available products,
you will recommend products that the user would be most interested in.

User History: {user_history}
Available Products: {product_catalog}

Please provide a list of product recommendations in the specified format.",
        user_history = input.user_history,
        product_catalog = input.product_catalog,
    )
}

fn output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["recommendations"]
    })
}
