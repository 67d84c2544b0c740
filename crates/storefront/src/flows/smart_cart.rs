//! Smart-cart suggestions flow.
//!
//! Suggests items to add to the cart from the user's purchase and browsing
//! history. The model returns a comma-separated list of product names; the
//! names are then resolved against the store's `products` collection.
//! No retry policy: callers degrade to an empty suggestion list.

use cartwheel_core::Product;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::genai::{GenerativeModel, ModelError};
use crate::store::{DocumentStore, FieldClause, StoreError, collections};

/// Purchase and browsing history, each as a comma-joined list.
#[derive(Debug, Clone, Deserialize)]
pub struct SmartCartSuggestionsInput {
    pub purchase_history: String,
    pub browsing_history: String,
}

/// The model's suggestions as a comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartCartSuggestionsOutput {
    pub suggested_items: String,
}

/// Suggest cart items from user history.
///
/// # Errors
///
/// Returns the model error unchanged; this flow has no retry policy.
#[instrument(skip(model, input))]
pub async fn smart_cart_suggestions(
    model: &dyn GenerativeModel,
    input: &SmartCartSuggestionsInput,
) -> Result<SmartCartSuggestionsOutput, ModelError> {
    let prompt = build_prompt(input);
    let value = model.generate_json(prompt, output_schema()).await?;
    serde_json::from_value(value).map_err(|e| ModelError::Parse(e.to_string()))
}

/// Split the model's comma-separated suggestion list into clean names.
#[must_use]
pub fn split_suggestions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Resolve suggested names against the store's product collection.
///
/// Names with no matching product are dropped silently.
///
/// # Errors
///
/// Returns `StoreError` if a store query fails.
pub async fn resolve_suggested_products(
    store: &dyn DocumentStore,
    names: &[String],
) -> Result<Vec<Product>, StoreError> {
    let mut products = Vec::new();
    for name in names {
        let documents = store
            .query_eq(
                collections::PRODUCTS,
                &[FieldClause::new("name", name.as_str())],
            )
            .await?;
        for document in documents {
            match document.decode::<Product>() {
                Ok(product) => products.push(product),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable suggested product");
                }
            }
        }
    }
    Ok(products)
}

fn build_prompt(input: &SmartCartSuggestionsInput) -> String {
    format!(
        r"Based on the user's purchase history and browsing history, suggest items that the user may want to add to their cart.

Purchase History: {purchase_history}
Browsing History: {browsing_history}

Suggest items that are related to the user's past purchases and browsing history.
Return the suggested items as a comma-separated list.",
        purchase_history = input.purchase_history,
        browsing_history = input.browsing_history,
    )
}

fn output_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "suggested_items": { "type": "string" }
        },
        "required": ["suggested_items"]
    })
}
