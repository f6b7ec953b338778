use crate::config::ServerConfig;
use crate::store::CatalogStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// File catalog (shared across requests)
    pub store: Arc<CatalogStore>,
}

impl ServerState {
    /// Create new server state: bootstrap directories and load the index
    pub fn new(config: ServerConfig) -> Self {
        for dir in config.bootstrap_dirs() {
            if let Err(err) = std::fs::create_dir_all(dir) {
                tracing::warn!(dir = %dir.display(), error = %err, "Could not create directory");
            }
        }

        let store = Arc::new(CatalogStore::load(
            config.index_path(),
            config.upload_dir.clone(),
        ));

        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub status: &'static str,
    pub timestamp: String,
    pub version: String,
    pub storage: &'static str,
    pub uptime_seconds: u64,
    pub file_count: usize,
}
