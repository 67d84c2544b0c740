//! Shopping assistant flow.
//!
//! Answers free-text shopping questions against the reconciled catalog and
//! recommends up to five products. Constraint extraction (price ranges,
//! categories) and ranking are delegated entirely to the model via the
//! instruction prompt; the output shape is enforced by a declared schema.
//!
//! Failure policy: up to three attempts, retrying only on transient
//! overload (the error text mentions `503` or `overloaded`) with
//! exponential backoff. Any other error aborts immediately. The caller
//! always receives an answer object; exhaustion degrades to a fixed
//! fallback with no recommendations.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::catalog::CatalogService;
use crate::genai::GenerativeModel;

/// Maximum model invocations per question.
const MAX_ATTEMPTS: u32 = 3;

/// Answer returned when every attempt has failed.
pub const FALLBACK_ANSWER: &str = "I'm sorry, but I'm currently experiencing high traffic and unable to process your request. Please try asking your question again in a few moments. In the meantime, you can browse our products directly on the products page.";

/// A free-text question for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestionInput {
    pub question: String,
}

/// A product recommendation as the model emits it.
///
/// Kept model-shaped (plain strings and numbers) rather than reusing the
/// domain `Product`: this is a boundary type validated against the response
/// schema, not a catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: String,
    pub category: String,
    pub image: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub features: Vec<String>,
}

/// The assistant's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskQuestionOutput {
    pub answer: String,
    #[serde(default)]
    pub recommended_products: Vec<RecommendedProduct>,
}

impl AskQuestionOutput {
    fn fallback() -> Self {
        Self {
            answer: FALLBACK_ANSWER.to_string(),
            recommended_products: Vec::new(),
        }
    }
}

/// Ask the shopping assistant a question.
///
/// Never fails: every error path degrades to the fixed fallback answer.
#[instrument(skip(model, catalog, input), fields(question = %input.question))]
pub async fn ask_question(
    model: &dyn GenerativeModel,
    catalog: &CatalogService,
    input: AskQuestionInput,
) -> AskQuestionOutput {
    let products = catalog.products(None).await;
    let catalog_json =
        serde_json::to_string(&products).unwrap_or_else(|_| "[]".to_string());
    let prompt = build_prompt(&input.question, &catalog_json);

    for attempt in 1..=MAX_ATTEMPTS {
        match model.generate_json(prompt.clone(), output_schema()).await {
            Ok(value) => match serde_json::from_value::<AskQuestionOutput>(value) {
                Ok(output) => {
                    info!(attempt, "Shopping assistant responded");
                    return output;
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Assistant output did not match schema");
                    break;
                }
            },
            Err(e) => {
                let message = e.to_string();
                if message.contains("503") || message.contains("overloaded") {
                    warn!(attempt, error = %message, "Model overloaded");
                    if attempt < MAX_ATTEMPTS {
                        // 2s, 4s between attempts
                        tokio::time::sleep(Duration::from_secs(2_u64.pow(attempt))).await;
                        continue;
                    }
                } else {
                    warn!(attempt, error = %message, "Assistant failed with non-recoverable error");
                    break;
                }
            }
        }
    }

    warn!("Shopping assistant exhausted, returning fallback answer");
    AskQuestionOutput::fallback()
}

fn build_prompt(question: &str, products: &str) -> String {
    format!(
        r#"You are a helpful shopping assistant for an e-commerce platform. Your goal is to help users find products that match their needs and provide relevant recommendations.

Available products database: {products}

User question: {question}

Instructions:
1. Analyze the user's question to understand what they're looking for
2. Provide a helpful answer addressing their question
3. IMPORTANT: If the question relates to shopping, finding products, or mentions any product categories, you MUST recommend relevant products from the available database
4. Search through the products for items that match the user's needs based on:
   - Category (apparel, electronics, beauty, home goods, shoes)
   - Price range (if mentioned) - STRICTLY filter by price constraints
   - Features or specifications
   - Description keywords
5. Always include 2-5 relevant product recommendations when the question is shopping-related
6. Focus on products with good ratings (4.0+) when possible
7. Include the full product details: id, name, price, description, category, image, rating, and features
8. PRICE FILTERING: When users specify price ranges like "above $50", "under $100", "between $20-$80", filter products accordingly

CRITICAL: When price constraints are mentioned, you MUST filter products to match those constraints exactly.

Respond with both a helpful answer AND product recommendations for any shopping-related query."#
    )
}

fn output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "answer": { "type": "string" },
            "recommended_products": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "name": { "type": "string" },
                        "price": { "type": "number" },
                        "description": { "type": "string" },
                        "category": { "type": "string" },
                        "image": { "type": "string" },
                        "rating": { "type": "number" },
                        "features": { "type": "array", "items": { "type": "string" } }
                    },
                    "required": ["id", "name", "price", "description", "category", "image"]
                }
            }
        },
        "required": ["answer"]
    })
}
