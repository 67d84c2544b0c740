//! Integration tests for the recommendation-style flows.

use std::time::Duration;

use cartwheel_core::Category;
use cartwheel_integration_tests::{InMemoryStore, ScriptedModel, product};
use cartwheel_storefront::flows::recommendations::{
    PersonalizedRecommendationsInput, personalized_recommendations,
};
use cartwheel_storefront::flows::smart_cart::{
    SmartCartSuggestionsInput, resolve_suggested_products, smart_cart_suggestions,
    split_suggestions,
};
use cartwheel_storefront::genai::ModelError;
use serde_json::json;
use tokio::time::Instant;

#[tokio::test]
async fn test_smart_cart_names_resolve_against_the_store() {
    let mut blanket = product("Linen Throw Blanket", Category::HomeGoods, 65_00);
    blanket.id = "remote-1".to_string();
    let mut serum = product("Radiant Glow Face Serum", Category::Beauty, 32_50);
    serum.id = "remote-2".to_string();
    let store = InMemoryStore::with_products(vec![blanket, serum]);

    let model = ScriptedModel::with_json_script(vec![Ok(json!({
        "suggested_items": "Linen Throw Blanket, Radiant Glow Face Serum, Unknown Thing"
    }))]);

    let output = smart_cart_suggestions(
        &model,
        &SmartCartSuggestionsInput {
            purchase_history: "Ceramic Pour-Over Coffee Set".to_string(),
            browsing_history: "Linen Throw Blanket".to_string(),
        },
    )
    .await
    .expect("suggestions");

    let names = split_suggestions(&output.suggested_items);
    assert_eq!(names.len(), 3);

    let resolved = resolve_suggested_products(&store, &names)
        .await
        .expect("resolve");

    // Unknown names drop out; matched products come back in full.
    assert_eq!(resolved.len(), 2);
    assert!(resolved.iter().any(|p| p.id == "remote-1"));
    assert!(resolved.iter().any(|p| p.id == "remote-2"));
}

#[tokio::test(start_paused = true)]
async fn test_personalized_recommendations_uses_fixed_one_second_delays() {
    let unavailable = || ModelError::Api {
        status: 503,
        message: "Service Unavailable".to_string(),
    };
    let model = ScriptedModel::with_json_script(vec![
        Err(unavailable()),
        Err(unavailable()),
        Ok(json!({"recommendations": ["All-Terrain Trail Runners"]})),
    ]);

    let started = Instant::now();
    let output = personalized_recommendations(
        &model,
        &PersonalizedRecommendationsInput {
            user_history: "bought trail shoes last spring".to_string(),
            product_catalog: "[]".to_string(),
        },
    )
    .await
    .expect("should succeed");

    assert_eq!(model.json_calls(), 3);
    // Fixed 1s delay per retry, unlike the assistant's doubling backoff.
    assert_eq!(started.elapsed(), Duration::from_secs(2));
    assert_eq!(output.recommendations, vec!["All-Terrain Trail Runners"]);
}

#[tokio::test]
async fn test_personalized_recommendations_rethrows_other_errors() {
    let model = ScriptedModel::with_json_script(vec![Err(ModelError::Unauthorized(
        "Invalid API key".to_string(),
    ))]);

    let err = personalized_recommendations(
        &model,
        &PersonalizedRecommendationsInput {
            user_history: String::new(),
            product_catalog: "[]".to_string(),
        },
    )
    .await
    .expect_err("should fail");

    assert_eq!(model.json_calls(), 1);
    assert!(matches!(err, ModelError::Unauthorized(_)));
}
