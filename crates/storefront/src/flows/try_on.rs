//! Virtual try-on flow.
//!
//! Generates a composite image of a person wearing an apparel product.
//! Preconditions are checked before any model call: the product must
//! exist (bundled catalog first, then the remote store), must have try-on
//! enabled, and must be apparel. Precondition violations surface as
//! descriptive errors with no retry.
//!
//! Generation makes one primary attempt with the product image referenced
//! by URL. If that fails specifically because the model host could not
//! download the product image, exactly one fallback attempt runs with a
//! textual product description instead. There is no retry loop here.

use cartwheel_core::{Category, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::catalog::CatalogService;
use crate::genai::{DataUri, GenerativeModel, Part};

/// Marker the model host puts in errors when it cannot fetch a referenced
/// image URL. Matched case-insensitively.
const MEDIA_DOWNLOAD_MARKER: &str = "error downloading media";

/// Errors raised by the try-on flow. Messages are user-facing.
#[derive(Debug, Error)]
pub enum TryOnError {
    /// No product with the requested id in local or remote data.
    #[error("Product with ID {0} not found")]
    ProductNotFound(String),

    /// The product exists but has try-on disabled.
    #[error("Virtual try-on is not available for product: {0}")]
    NotEligible(String),

    /// The product is not apparel.
    #[error("Virtual try-on is only available for apparel items. This product is in category: {0}")]
    WrongCategory(Category),

    /// The supplied person photo is not a valid data URI.
    #[error("Invalid person image: {0}")]
    InvalidImage(String),

    /// Both generation paths failed, or the primary failed unrecoverably.
    #[error("{0}")]
    Generation(String),
}

/// A person photo and the product to try on.
#[derive(Debug, Clone, Deserialize)]
pub struct VirtualTryOnInput {
    /// Photo of the person as a `data:<mime>;base64,<data>` URI.
    pub person_image: String,
    /// Id of the apparel product to try on.
    pub product_id: String,
}

/// Summary of the product that was tried on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnProductSummary {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub description: String,
    pub category: Category,
    pub image: String,
}

impl From<&Product> for TryOnProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            description: product.description.clone(),
            category: product.category,
            image: product.image.clone(),
        }
    }
}

/// The generated composite image plus the resolved product.
#[derive(Debug, Clone, Serialize)]
pub struct VirtualTryOnOutput {
    /// Generated try-on image as a data URI.
    pub generated_image: String,
    /// The product that was tried on.
    pub product: TryOnProductSummary,
}

/// Generate a virtual try-on image.
///
/// # Errors
///
/// Returns a precondition error if the product is missing, not try-on
/// enabled, or not apparel; `TryOnError::Generation` if generation fails.
#[instrument(skip(model, catalog, input), fields(product_id = %input.product_id))]
pub async fn virtual_try_on(
    model: &dyn GenerativeModel,
    catalog: &CatalogService,
    input: VirtualTryOnInput,
) -> Result<VirtualTryOnOutput, TryOnError> {
    let product = catalog
        .product(&input.product_id)
        .await
        .ok_or_else(|| TryOnError::ProductNotFound(input.product_id.clone()))?;

    if !product.try_on_available {
        return Err(TryOnError::NotEligible(product.name));
    }

    if product.category != Category::Apparel {
        return Err(TryOnError::WrongCategory(product.category));
    }

    let person = DataUri::parse(&input.person_image)
        .map_err(|e| TryOnError::InvalidImage(e.to_string()))?;

    info!(product = %product.name, "Generating virtual try-on");

    let primary = vec![
        Part::InlineImage {
            mime_type: person.mime_type.clone(),
            data: person.data.clone(),
        },
        Part::ImageUri(product.image.clone()),
        Part::Text(composite_instruction(&product)),
    ];

    match model.generate_image(primary).await {
        Ok(image) => Ok(VirtualTryOnOutput {
            generated_image: image.data_uri,
            product: TryOnProductSummary::from(&product),
        }),
        Err(e) => {
            let message = e.to_string();
            if message.to_lowercase().contains(MEDIA_DOWNLOAD_MARKER) {
                warn!(product = %product.name, "Product image inaccessible, retrying with text description");
                generate_from_description(model, &person, &product).await
            } else {
                Err(TryOnError::Generation(format!(
                    "Virtual try-on generation failed for {}: {message}",
                    product.name
                )))
            }
        }
    }
}

/// The single fallback attempt: person image plus a textual product
/// description in place of the product image.
async fn generate_from_description(
    model: &dyn GenerativeModel,
    person: &DataUri,
    product: &Product,
) -> Result<VirtualTryOnOutput, TryOnError> {
    let fallback = vec![
        Part::InlineImage {
            mime_type: person.mime_type.clone(),
            data: person.data.clone(),
        },
        Part::Text(description_instruction(product)),
    ];

    match model.generate_image(fallback).await {
        Ok(image) => Ok(VirtualTryOnOutput {
            generated_image: image.data_uri,
            product: TryOnProductSummary::from(product),
        }),
        Err(e) => {
            warn!(product = %product.name, error = %e, "Fallback try-on generation failed");
            Err(TryOnError::Generation(format!(
                "Unable to generate virtual try-on for {}. The product image may be temporarily unavailable. Please try with a different product or try again later.",
                product.name
            )))
        }
    }
}

fn composite_instruction(product: &Product) -> String {
    format!(
        "Generate a realistic image of the person in the first image wearing the {name} from the second image. The clothing item should fit naturally on the person while maintaining the original design, color, and style of the {name}. Keep the person's pose, facial features, and background exactly the same. Only replace or add the clothing item - do not modify anything else about the person or scene. Make sure the clothing looks realistic and properly fitted.",
        name = product.name
    )
}

fn description_instruction(product: &Product) -> String {
    let features = if product.features.is_empty() {
        "standard clothing features".to_string()
    } else {
        product.features.join(", ")
    };
    format!(
        "Generate a realistic image of the person in the image wearing a {name}. Based on the product description: \"{description}\". The clothing item should fit naturally on the person while maintaining their original pose, facial features, and background. Only add or replace the clothing item - do not modify anything else about the person or scene. Make sure the clothing looks realistic and properly fitted. Use the product features to guide the appearance: {features}.",
        name = product.name,
        description = product.description,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flows::testing::ScriptedModel;
    use crate::genai::{GeneratedImage, ModelError};

    const PERSON: &str = "data:image/png;base64,aGVsbG8=";

    fn sample(category: Category, try_on: bool) -> Product {
        Product {
            id: String::new(),
            name: "Classic Black T-Shirt".to_string(),
            price: Decimal::new(3500, 2),
            description: "A timeless staple".to_string(),
            category,
            image: "https://example.com/tee.jpg".to_string(),
            features: vec!["100% cotton".to_string()],
            rating: 4.5,
            reviews: 120,
            try_on_available: try_on,
            seller_id: None,
        }
    }

    fn catalog_with(product: Product) -> CatalogService {
        CatalogService::with_products(vec![product], None)
    }

    fn input(product_id: &str) -> VirtualTryOnInput {
        VirtualTryOnInput {
            person_image: PERSON.to_string(),
            product_id: product_id.to_string(),
        }
    }

    fn generated() -> GeneratedImage {
        GeneratedImage {
            data_uri: "data:image/png;base64,Z2VuZXJhdGVk".to_string(),
            text: None,
        }
    }

    fn download_error() -> ModelError {
        ModelError::Api {
            status: 400,
            message: "HTTP error downloading media: 403 Forbidden".to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_product_raises_not_found() {
        let model = ScriptedModel::default();
        let err = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, true)), input("missing"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, TryOnError::ProductNotFound(_)));
        assert_eq!(err.to_string(), "Product with ID missing not found");
        assert_eq!(model.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_try_on_disabled_raises_eligibility_error() {
        let model = ScriptedModel::default();
        let err = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, false)), input("product-1"))
            .await
            .expect_err("should fail");

        assert!(matches!(err, TryOnError::NotEligible(_)));
        assert_eq!(model.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_non_apparel_raises_category_error() {
        let model = ScriptedModel::default();
        let err = virtual_try_on(
            &model,
            &catalog_with(sample(Category::Electronics, true)),
            input("product-1"),
        )
        .await
        .expect_err("should fail");

        assert!(matches!(err, TryOnError::WrongCategory(Category::Electronics)));
        assert!(err.to_string().contains("electronics"));
        assert_eq!(model.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_person_image_rejected_before_generation() {
        let model = ScriptedModel::default();
        let err = virtual_try_on(
            &model,
            &catalog_with(sample(Category::Apparel, true)),
            VirtualTryOnInput {
                person_image: "not-a-data-uri".to_string(),
                product_id: "product-1".to_string(),
            },
        )
        .await
        .expect_err("should fail");

        assert!(matches!(err, TryOnError::InvalidImage(_)));
        assert_eq!(model.image_calls(), 0);
    }

    #[tokio::test]
    async fn test_primary_success_returns_image_and_product_summary() {
        let model = ScriptedModel::with_image_script(vec![Ok(generated())]);
        let output = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, true)), input("product-1"))
            .await
            .expect("should succeed");

        assert_eq!(model.image_calls(), 1);
        assert_eq!(output.generated_image, generated().data_uri);
        assert_eq!(output.product.name, "Classic Black T-Shirt");
        assert_eq!(output.product.category, Category::Apparel);

        // Primary request references the product image by URL.
        let parts = model.image_request(0);
        assert!(parts.iter().any(|p| matches!(p, Part::ImageUri(url) if url.contains("tee.jpg"))));
    }

    #[tokio::test]
    async fn test_download_failure_triggers_single_text_only_fallback() {
        let model = ScriptedModel::with_image_script(vec![
            Err(download_error()),
            Ok(generated()),
        ]);
        let output = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, true)), input("product-1"))
            .await
            .expect("fallback should succeed");

        assert_eq!(model.image_calls(), 2);
        assert_eq!(output.generated_image, generated().data_uri);

        // Fallback request drops the product image URL and describes it instead.
        let parts = model.image_request(1);
        assert!(!parts.iter().any(|p| matches!(p, Part::ImageUri(_))));
        assert!(parts.iter().any(
            |p| matches!(p, Part::Text(text) if text.contains("A timeless staple") && text.contains("100% cotton"))
        ));
    }

    #[tokio::test]
    async fn test_fallback_failure_raises_user_facing_error() {
        let model = ScriptedModel::with_image_script(vec![
            Err(download_error()),
            Err(ModelError::MissingImage),
        ]);
        let err = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, true)), input("product-1"))
            .await
            .expect_err("should fail");

        assert_eq!(model.image_calls(), 2);
        assert!(err.to_string().contains("may be temporarily unavailable"));
    }

    #[tokio::test]
    async fn test_non_download_failure_does_not_fall_back() {
        let model = ScriptedModel::with_image_script(vec![Err(ModelError::Unauthorized(
            "Invalid API key".to_string(),
        ))]);
        let err = virtual_try_on(&model, &catalog_with(sample(Category::Apparel, true)), input("product-1"))
            .await
            .expect_err("should fail");

        assert_eq!(model.image_calls(), 1);
        assert!(err.to_string().contains("Virtual try-on generation failed for"));
    }
}
