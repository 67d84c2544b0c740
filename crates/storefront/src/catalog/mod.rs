//! Catalog reconciliation.
//!
//! The displayed catalog is the bundled product list merged with whatever
//! the remote document store holds, deduplicated by `(name, category)` with
//! local entries winning. The remote store is optional infrastructure:
//! every remote failure is swallowed and logged, and the caller gets the
//! local catalog instead. Availability over freshness.

pub mod local;

use std::sync::Arc;

use cartwheel_core::{Category, Product};
use tracing::instrument;

use crate::store::{DocumentStore, FieldClause, collections};

/// Read access to the reconciled product catalog.
///
/// Holds the bundled catalog (synthetic ids assigned at construction) and
/// an optional handle to the remote store, injected once at startup.
#[derive(Clone)]
pub struct CatalogService {
    local: Arc<Vec<Product>>,
    store: Option<Arc<dyn DocumentStore>>,
}

impl CatalogService {
    /// Create a catalog over the bundled product list.
    #[must_use]
    pub fn new(store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self::with_products(local::products(), store)
    }

    /// Create a catalog over an explicit local product list.
    #[must_use]
    pub fn with_products(local: Vec<Product>, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self {
            local: Arc::new(assign_synthetic_ids(local)),
            store,
        }
    }

    /// The bundled catalog with synthetic ids assigned.
    #[must_use]
    pub fn local_products(&self) -> &[Product] {
        &self.local
    }

    /// The reconciled catalog, optionally filtered by category.
    ///
    /// Display order is insertion order: local entries first, then remote
    /// entries whose `(name, category)` pair is new. Never fails; remote
    /// errors degrade to local-only data.
    #[instrument(skip(self))]
    pub async fn products(&self, filter: Option<Category>) -> Vec<Product> {
        let mut all = self.local.as_ref().clone();

        if let Some(remote) = self.fetch_remote().await {
            merge_novel(&mut all, remote);
        }

        if let Some(category) = filter {
            all.retain(|p| p.category == category);
        }

        all
    }

    /// Look up one product by id: bundled catalog first, then the remote
    /// store. Remote errors degrade to "not found".
    #[instrument(skip(self), fields(id = %id))]
    pub async fn product(&self, id: &str) -> Option<Product> {
        if let Some(product) = self.local.iter().find(|p| p.id == id) {
            return Some(product.clone());
        }

        let store = self.store.as_ref()?;
        match store.get(collections::PRODUCTS, id).await {
            Ok(Some(document)) => match document.decode::<Product>() {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping undecodable remote product");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Remote product lookup failed");
                None
            }
        }
    }

    /// Products eligible for virtual try-on: apparel with try-on enabled,
    /// merged across local and remote the same way as [`Self::products`].
    #[instrument(skip(self))]
    pub async fn try_on_products(&self) -> Vec<Product> {
        let mut eligible: Vec<Product> = self
            .local
            .iter()
            .filter(|p| p.category == Category::Apparel && p.try_on_available)
            .cloned()
            .collect();

        if let Some(store) = &self.store {
            let clauses = [
                FieldClause::new("category", Category::Apparel.as_str()),
                FieldClause::new("try_on_available", true),
            ];
            match store.query_eq(collections::PRODUCTS, &clauses).await {
                Ok(documents) => merge_novel(&mut eligible, decode_documents(documents)),
                Err(e) => {
                    tracing::warn!(error = %e, "Remote try-on query failed, using local data only");
                }
            }
        }

        eligible
    }

    async fn fetch_remote(&self) -> Option<Vec<Product>> {
        let store = self.store.as_ref()?;
        match store.list(collections::PRODUCTS).await {
            Ok(documents) => Some(decode_documents(documents)),
            Err(e) => {
                tracing::warn!(error = %e, "Remote product fetch failed, using local data only");
                None
            }
        }
    }
}

/// Assign `product-{n}` ids (1-based position) to entries lacking one.
fn assign_synthetic_ids(products: Vec<Product>) -> Vec<Product> {
    products
        .into_iter()
        .enumerate()
        .map(|(index, mut product)| {
            if product.id.is_empty() {
                product.id = format!("product-{}", index + 1);
            }
            product
        })
        .collect()
}

/// Append remote products whose `(name, category)` pair is not already
/// present. Existing entries always win.
fn merge_novel(existing: &mut Vec<Product>, remote: Vec<Product>) {
    for candidate in remote {
        if !existing.iter().any(|p| p.same_listing(&candidate)) {
            existing.push(candidate);
        }
    }
}

fn decode_documents(documents: Vec<crate::store::Document>) -> Vec<Product> {
    documents
        .into_iter()
        .filter_map(|document| match document.decode::<Product>() {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping undecodable remote product");
                None
            }
        })
        .collect()
}
