//! Error types for the generative-model API client.

use thiserror::Error;

/// Errors that can occur when invoking the hosted model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The model API returned an error response.
    ///
    /// The display form joins the numeric status and the message so retry
    /// policies matching on substrings like `503 Service Unavailable` see
    /// the text the API actually sent.
    #[error("model API error: {status} {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Rate limited by the API.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication failed.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Failed to parse the response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The response carried no image where one was required.
    #[error("image generation returned no media")]
    MissingImage,

    /// A supplied image payload was not a valid data URI.
    #[error("invalid image payload: {0}")]
    InvalidImage(String),
}

/// API error response envelope.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Nested error details.
    pub error: ApiError,
}

/// Nested error details.
#[derive(Debug, serde::Deserialize)]
pub struct ApiError {
    /// Numeric error code (mirrors the HTTP status).
    #[serde(default)]
    pub code: u16,
    /// Error message.
    pub message: String,
    /// Canonical status name (e.g. `UNAVAILABLE`).
    #[serde(default)]
    pub status: String,
}
