//! Application state shared across handlers.

use scheme_core::IdGenerator;
use scheme_core::config::AppConfig;
use scheme_metadata::MetadataStore;
use scheme_storage::ObjectStore;
use std::sync::Arc;

/// Shared application state.
///
/// Every collaborator is built once at startup and injected here.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Metadata store.
    pub metadata: Arc<dyn MetadataStore>,
    /// Primary key generator.
    pub ids: Arc<IdGenerator>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
        ids: IdGenerator,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metadata,
            ids: Arc::new(ids),
        }
    }

    /// Next primary key.
    pub fn next_id(&self) -> i64 {
        self.ids.generate()
    }
}
