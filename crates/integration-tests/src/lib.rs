//! Integration tests for Cartwheel.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests
//! ```
//!
//! The tests exercise flow and service logic end-to-end against the fakes
//! in this crate: a scripted generative model (replays a fixed sequence of
//! responses and records calls) and an in-memory document store. Retry
//! timing is asserted under a paused tokio clock, so no test sleeps for
//! real.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use cartwheel_core::Product;
use cartwheel_storefront::genai::{GeneratedImage, GenerativeModel, ModelError, Part};
use cartwheel_storefront::store::{
    Document, DocumentStore, FieldClause, StoreError, collections, encode,
};

// =============================================================================
// Scripted generative model
// =============================================================================

/// A model that replays a script of responses and records every call.
#[derive(Default)]
pub struct ScriptedModel {
    json_script: Mutex<VecDeque<Result<serde_json::Value, ModelError>>>,
    image_script: Mutex<VecDeque<Result<GeneratedImage, ModelError>>>,
    json_calls: AtomicUsize,
    image_calls: AtomicUsize,
    image_requests: Mutex<Vec<Vec<Part>>>,
}

impl ScriptedModel {
    /// A model that answers `generate_json` calls from the given script.
    #[must_use]
    pub fn with_json_script(script: Vec<Result<serde_json::Value, ModelError>>) -> Self {
        Self {
            json_script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// A model that answers `generate_image` calls from the given script.
    #[must_use]
    pub fn with_image_script(script: Vec<Result<GeneratedImage, ModelError>>) -> Self {
        Self {
            image_script: Mutex::new(script.into()),
            ..Self::default()
        }
    }

    /// Number of `generate_json` invocations so far.
    #[must_use]
    pub fn json_calls(&self) -> usize {
        self.json_calls.load(Ordering::SeqCst)
    }

    /// Number of `generate_image` invocations so far.
    #[must_use]
    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    /// The parts sent in the `index`-th image request.
    ///
    /// # Panics
    ///
    /// Panics if fewer than `index + 1` image requests were made.
    #[must_use]
    pub fn image_request(&self, index: usize) -> Vec<Part> {
        self.image_requests
            .lock()
            .expect("lock")
            .get(index)
            .cloned()
            .expect("recorded image request")
    }

    /// The transient-overload error shape the retry policies match on.
    #[must_use]
    pub fn overloaded() -> ModelError {
        ModelError::Api {
            status: 503,
            message: "The model is overloaded. Please try again later.".to_string(),
        }
    }

    /// The media-download failure that triggers the try-on fallback.
    #[must_use]
    pub fn download_failure() -> ModelError {
        ModelError::Api {
            status: 400,
            message: "HTTP error downloading media: 403 Forbidden".to_string(),
        }
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate_json(
        &self,
        _prompt: String,
        _schema: serde_json::Value,
    ) -> Result<serde_json::Value, ModelError> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        self.json_script
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Parse("script exhausted".to_string())))
    }

    async fn generate_image(&self, parts: Vec<Part>) -> Result<GeneratedImage, ModelError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.image_requests.lock().expect("lock").push(parts);
        self.image_script
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::MissingImage))
    }
}

// =============================================================================
// In-memory document store
// =============================================================================

/// An in-memory document store with auto-assigned ids per collection.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<String, Vec<Document>>>,
}

impl InMemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `products` collection holds the given products,
    /// keeping their ids.
    ///
    /// # Panics
    ///
    /// Panics if a product fails to serialize.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        let store = Self::new();
        {
            let mut documents = store.documents.lock().expect("lock");
            let collection = documents.entry(collections::PRODUCTS.to_string()).or_default();
            for product in products {
                collection.push(Document {
                    id: product.id.clone(),
                    fields: encode(&product).expect("encode product"),
                });
            }
        }
        store
    }

    /// Every document currently in a collection.
    #[must_use]
    pub fn documents_in(&self, collection: &str) -> Vec<Document> {
        self.documents
            .lock()
            .expect("lock")
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.documents_in(collection))
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        Ok(self
            .documents_in(collection)
            .into_iter()
            .find(|document| document.id == id))
    }

    async fn query_eq(
        &self,
        collection: &str,
        clauses: &[FieldClause],
    ) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents_in(collection)
            .into_iter()
            .filter(|document| {
                clauses
                    .iter()
                    .all(|clause| document.fields.get(&clause.field) == Some(&clause.equals))
            })
            .collect())
    }

    async fn create(
        &self,
        collection: &str,
        fields: serde_json::Value,
    ) -> Result<String, StoreError> {
        let mut documents = self.documents.lock().expect("lock");
        let entries = documents.entry(collection.to_string()).or_default();
        let id = format!("{collection}-{}", entries.len() + 1);
        entries.push(Document {
            id: id.clone(),
            fields,
        });
        Ok(id)
    }
}

/// A store that fails every operation, for degradation tests.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn list(&self, _: &str) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Api {
            status: 500,
            message: "store offline".to_string(),
        })
    }

    async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
        Err(StoreError::Api {
            status: 500,
            message: "store offline".to_string(),
        })
    }

    async fn query_eq(&self, _: &str, _: &[FieldClause]) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::Api {
            status: 500,
            message: "store offline".to_string(),
        })
    }

    async fn create(&self, _: &str, _: serde_json::Value) -> Result<String, StoreError> {
        Err(StoreError::Api {
            status: 500,
            message: "store offline".to_string(),
        })
    }
}

// =============================================================================
// Product builder
// =============================================================================

/// Shorthand product constructor for tests.
#[must_use]
pub fn product(name: &str, category: cartwheel_core::Category, price_cents: i64) -> Product {
    Product {
        id: String::new(),
        name: name.to_string(),
        price: rust_decimal::Decimal::new(price_cents, 2),
        description: format!("{name} description"),
        category,
        image: format!("https://example.com/{}.jpg", name.replace(' ', "-").to_lowercase()),
        features: vec!["well made".to_string()],
        rating: 4.2,
        reviews: 10,
        try_on_available: false,
        seller_id: None,
    }
}
