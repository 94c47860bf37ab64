//! Application state.

use std::sync::Arc;

use arvekit_store::Store;

use crate::config::ServiceConfig;
use crate::registry::RegistryClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Business registry autocomplete client.
    pub registry: RegistryClient,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let registry = RegistryClient::new(&config.registry_api_url);
        tracing::info!(registry_url = %config.registry_api_url, "Registry proxy configured");

        Self {
            store,
            registry,
            config,
        }
    }
}
