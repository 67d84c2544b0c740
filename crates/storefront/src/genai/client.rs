//! HTTP client for the hosted generative-model API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::ModelConfig;

use super::error::{ApiErrorResponse, ModelError};
use super::types::{
    Content, GenerateRequest, GenerateResponse, GenerationConfig, Part, WirePart,
};
use super::{GeneratedImage, GenerativeModel};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Generative-model API client.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct ModelClient {
    inner: Arc<ModelClientInner>,
}

struct ModelClientInner {
    client: reqwest::Client,
    base_url: String,
    model: String,
    image_model: String,
}

impl ModelClient {
    /// Create a new model client.
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &ModelConfig) -> Self {
        let api_key = config.api_key.expose_secret();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(api_key).expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(ModelClientInner {
                client,
                base_url: config.base_url.clone(),
                model: config.model.clone(),
                image_model: config.image_model.clone(),
            }),
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{model}:generateContent",
            self.inner.base_url
        )
    }

    async fn invoke(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ModelError> {
        let response = self
            .inner
            .client
            .post(self.endpoint(model))
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ModelError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(handle_error_status(status, response).await)
        }
    }
}

#[async_trait]
impl GenerativeModel for ModelClient {
    #[instrument(skip(self, prompt, schema), fields(model = %self.inner.model))]
    async fn generate_json(
        &self,
        prompt: String,
        schema: serde_json::Value,
    ) -> Result<serde_json::Value, ModelError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![WirePart::Text { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(schema),
                response_modalities: None,
            }),
        };

        let response = self.invoke(&self.inner.model, &request).await?;

        let text = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| ModelError::Parse("response has no text part".to_string()))?;

        serde_json::from_str(&text)
            .map_err(|e| ModelError::Parse(format!("structured output is not valid JSON: {e}")))
    }

    #[instrument(skip(self, parts), fields(model = %self.inner.image_model))]
    async fn generate_image(&self, parts: Vec<Part>) -> Result<GeneratedImage, ModelError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: parts.into_iter().map(Into::into).collect(),
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_schema: None,
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
            }),
        };

        let response = self.invoke(&self.inner.image_model, &request).await?;

        let mut text = None;
        let mut image = None;

        for part in response
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts)
            .unwrap_or_default()
        {
            if let Some(t) = part.text {
                text.get_or_insert(t);
            }
            if let Some(inline) = part.inline_data {
                image.get_or_insert(format!(
                    "data:{};base64,{}",
                    inline.mime_type, inline.data
                ));
            }
        }

        image
            .map(|data_uri| GeneratedImage { data_uri, text })
            .ok_or(ModelError::MissingImage)
    }
}

/// Map an error status code to a `ModelError`.
async fn handle_error_status(
    status: reqwest::StatusCode,
    response: reqwest::Response,
) -> ModelError {
    // Check for rate limiting
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return ModelError::RateLimited(retry_after);
    }

    // Check for unauthorized
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ModelError::Unauthorized("Invalid API key".to_string());
    }

    // Try to parse the API error body
    match response.text().await {
        Ok(body) => {
            if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                ModelError::Api {
                    status: status.as_u16(),
                    message: api_error.error.message,
                }
            } else {
                ModelError::Api {
                    status: status.as_u16(),
                    message: body.chars().take(200).collect(),
                }
            }
        }
        Err(e) => ModelError::Http(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn client() -> ModelClient {
        ModelClient::new(&ModelConfig {
            api_key: SecretString::from("k9!mX2@pQ7&vB4^"),
            model: "gemini-2.0-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        })
    }

    #[test]
    fn test_endpoint_building() {
        let client = client();
        assert_eq!(
            client.endpoint("gemini-2.0-flash"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_model_client_is_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<ModelClient>();
        assert_send_sync::<ModelClient>();
    }
}
