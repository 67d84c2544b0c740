//! REST client for the remote document store.
//!
//! Uses `reqwest` with an API-key header. Product list reads are cached
//! with `moka` (5-minute TTL); order and user reads always go to the store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::config::DocumentStoreConfig;

use super::{Document, DocumentStore, FieldClause, StoreError, collections};

const API_KEY_HEADER: &str = "x-api-key";
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes
const CACHE_CAPACITY: u64 = 64;

/// Client for the remote document store REST API.
///
/// Cheaply cloneable; all state lives behind an `Arc`.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
    list_cache: Cache<String, Vec<Document>>,
}

#[derive(Deserialize)]
struct DocumentEnvelope {
    id: String,
    fields: serde_json::Value,
}

#[derive(Deserialize)]
struct DocumentListResponse {
    documents: Vec<DocumentEnvelope>,
}

#[derive(Deserialize)]
struct CreateResponse {
    id: String,
}

impl From<DocumentEnvelope> for Document {
    fn from(envelope: DocumentEnvelope) -> Self {
        Self {
            id: envelope.id,
            fields: envelope.fields,
        }
    }
}

impl StoreClient {
    /// Create a new document store client.
    #[must_use]
    pub fn new(config: &DocumentStoreConfig) -> Self {
        let list_cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(StoreClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
                access_token: config.api_key.expose_secret().to_string(),
                list_cache,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{path}", self.inner.base_url)
    }

    /// Send a request and parse the response body as `T`.
    async fn execute<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, StoreError> {
        let response = request
            .header(API_KEY_HEADER, &self.inner.access_token)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(StoreError::RateLimited(retry_after));
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(status.to_string()));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Document store returned non-success status"
            );
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse document store response"
            );
            StoreError::Parse(e)
        })
    }

    /// Invalidate the cached product list (call after product writes).
    pub async fn invalidate_products(&self) {
        self.inner
            .list_cache
            .invalidate(&format!("list:{}", collections::PRODUCTS))
            .await;
    }
}

#[async_trait]
impl DocumentStore for StoreClient {
    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let cache_key = format!("list:{collection}");

        // Only the product catalog is read-all; cache it
        if collection == collections::PRODUCTS
            && let Some(documents) = self.inner.list_cache.get(&cache_key).await
        {
            debug!("Cache hit for product list");
            return Ok(documents);
        }

        let request = self.inner.client.get(self.url(&format!("{collection}/documents")));
        let response: DocumentListResponse = self.execute(request).await?;
        let documents: Vec<Document> = response.documents.into_iter().map(Into::into).collect();

        if collection == collections::PRODUCTS {
            self.inner
                .list_cache
                .insert(cache_key, documents.clone())
                .await;
        }

        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %collection, id = %id))]
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let request = self
            .inner
            .client
            .get(self.url(&format!("{collection}/documents/{id}")));

        let response = request
            .header(API_KEY_HEADER, &self.inner.access_token)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let envelope: DocumentEnvelope = serde_json::from_str(&body)?;
        Ok(Some(envelope.into()))
    }

    #[instrument(skip(self, clauses), fields(collection = %collection))]
    async fn query_eq(
        &self,
        collection: &str,
        clauses: &[FieldClause],
    ) -> Result<Vec<Document>, StoreError> {
        let request = self
            .inner
            .client
            .post(self.url(&format!("{collection}/documents:query")))
            .json(&serde_json::json!({ "where": clauses }));

        let response: DocumentListResponse = self.execute(request).await?;
        Ok(response.documents.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, fields), fields(collection = %collection))]
    async fn create(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<String, StoreError> {
        let request = self
            .inner
            .client
            .post(self.url(&format!("{collection}/documents")))
            .json(&serde_json::json!({ "fields": fields }));

        let response: CreateResponse = self.execute(request).await?;

        if collection == collections::PRODUCTS {
            self.invalidate_products().await;
        }

        Ok(response.id)
    }
}
