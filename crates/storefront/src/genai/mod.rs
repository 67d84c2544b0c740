//! Hosted generative-model API client.
//!
//! # Architecture
//!
//! Two invocation shapes cover every AI feature in the storefront:
//!
//! - structured generation: a text prompt plus a declared JSON response
//!   schema, parsed into a typed output at the flow boundary
//! - image generation: an ordered list of text/image parts, returning a
//!   generated image as a data URI
//!
//! Both are single-call, potentially-failing remote procedures; no
//! streaming contract is exposed at this layer. Retry and fallback policy
//! belongs to the individual flows, not the client.
//!
//! The [`GenerativeModel`] trait is the seam the flows are written
//! against, so tests can script responses and count invocations.

mod client;
mod error;
mod types;

pub use client::ModelClient;
pub use error::{ApiError, ApiErrorResponse, ModelError};
pub use types::{DataUri, GeneratedImage, Part};

use async_trait::async_trait;

/// The model operations the AI flows depend on.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate structured output conforming to `schema` (a JSON Schema
    /// document) from a text prompt.
    async fn generate_json(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, ModelError>;

    /// Generate an image from an ordered list of text/image parts.
    async fn generate_image(&self, parts: Vec<Part>) -> Result<GeneratedImage, ModelError>;
}
