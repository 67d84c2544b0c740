//! Remote document store client.
//!
//! # Architecture
//!
//! The store is an opaque key/document service holding three collections:
//!
//! - `products` - seller-listed products merged into the catalog
//! - `orders` - orders written at checkout
//! - `users` - account profiles and credentials
//!
//! Core logic only ever needs four operations: read-all, read-by-id,
//! query-by-field-equality, and create-document. The [`DocumentStore`]
//! trait captures exactly those, so tests can substitute in-memory fakes
//! and the rest of the service never sees the wire format.
//!
//! The store is optional infrastructure: when it is not configured the
//! storefront serves the bundled catalog only, and every read path is
//! written to degrade rather than fail when the store errors.

mod client;

pub use client::StoreClient;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Collection names used by the storefront.
pub mod collections {
    /// Seller-listed products.
    pub const PRODUCTS: &str = "products";
    /// Orders created at checkout.
    pub const ORDERS: &str = "orders";
    /// Account profiles.
    pub const USERS: &str = "users";
}

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document or collection not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the store.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Store returned an error response.
    #[error("store error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        message: String,
    },
}

/// A document with its store-assigned id.
///
/// Ids live in the envelope, not in the document payload; [`Document::decode`]
/// folds the id back into the payload under `"id"` so domain types can keep
/// a plain `id` field.
#[derive(Debug, Clone)]
pub struct Document {
    /// Store-assigned document id.
    pub id: String,
    /// Document payload.
    pub fields: serde_json::Value,
}

impl Document {
    /// Deserialize the payload into `T`, injecting the envelope id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the payload does not match `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let mut fields = self.fields;
        if let Some(object) = fields.as_object_mut() {
            object.insert("id".to_string(), serde_json::Value::String(self.id));
        }
        Ok(serde_json::from_value(fields)?)
    }
}

/// Serialize a domain value into a document payload.
///
/// Strips the `id` field: ids are assigned by the store and carried in the
/// document envelope, never in the payload.
///
/// # Errors
///
/// Returns `StoreError::Parse` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    let mut fields = serde_json::to_value(value)?;
    if let Some(object) = fields.as_object_mut() {
        object.remove("id");
    }
    Ok(fields)
}

/// An equality clause for [`DocumentStore::query_eq`].
#[derive(Debug, Clone, Serialize)]
pub struct FieldClause {
    /// Field name in the document payload.
    pub field: String,
    /// Value the field must equal.
    pub equals: serde_json::Value,
}

impl FieldClause {
    /// Create an equality clause.
    #[must_use]
    pub fn new(field: impl Into<String>, equals: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }
}

/// The document-store operations core logic depends on.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// List every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetch one document by id. `Ok(None)` when the id does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Fetch documents matching every equality clause.
    async fn query_eq(
        &self,
        collection: &str,
        clauses: &[FieldClause],
    ) -> Result<Vec<Document>, StoreError>;

    /// Create a document, returning its store-assigned id.
    async fn create(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<String, StoreError>;
}
