//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogService;
use crate::config::StorefrontConfig;
use crate::genai::{GenerativeModel, ModelClient};
use crate::services::auth::AuthService;
use crate::store::{DocumentStore, StoreClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources. The document store capability is resolved exactly
/// once here: every dependent code path receives the same
/// `Option<Arc<dyn DocumentStore>>` instead of re-checking configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: Option<Arc<dyn DocumentStore>>,
    catalog: CatalogService,
    model: Arc<dyn GenerativeModel>,
    auth: AuthService,
}

impl AppState {
    /// Create a new application state from configuration.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let store: Option<Arc<dyn DocumentStore>> = config
            .docstore
            .as_ref()
            .map(|docstore| Arc::new(StoreClient::new(docstore)) as Arc<dyn DocumentStore>);

        if store.is_some() {
            tracing::info!("Document store configured; catalog merges remote products");
        } else {
            tracing::warn!("Document store not configured; running on the bundled catalog only");
        }

        let model: Arc<dyn GenerativeModel> = Arc::new(ModelClient::new(&config.model));

        Self::with_collaborators(config, store, model)
    }

    /// Create an application state with explicit collaborators.
    ///
    /// `new` delegates here after building the real clients; tests inject
    /// fakes through the same seam.
    #[must_use]
    pub fn with_collaborators(
        config: StorefrontConfig,
        store: Option<Arc<dyn DocumentStore>>,
        model: Arc<dyn GenerativeModel>,
    ) -> Self {
        let catalog = CatalogService::new(store.clone());
        let auth = AuthService::new(store.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                catalog,
                model,
                auth,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the document store handle, if the capability is configured.
    #[must_use]
    pub fn store(&self) -> Option<&Arc<dyn DocumentStore>> {
        self.inner.store.as_ref()
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the generative model client.
    #[must_use]
    pub fn model(&self) -> &dyn GenerativeModel {
        self.inner.model.as_ref()
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }
}
