//! Application state management

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::config::Config;
use crate::signing::SigningService;
use crate::storage::{FileStore, StorageError};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to initialize storage: {0}")]
    Storage(#[from] StorageError),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pub config: Config,
    pub documents: FileStore,
    pub artifacts: FileStore,
    pub db: SqlitePool,
    pub signing: SigningService,
}

impl AppState {
    /// Create a new application state
    ///
    /// Opens both file stores (creating their directories if missing) and
    /// wires up the signing service.
    pub async fn new(config: Config, db: SqlitePool) -> Result<Self, StateError> {
        let documents = FileStore::open(config.storage.documents_dir.clone()).await?;
        let artifacts = FileStore::open(config.storage.artifacts_dir.clone()).await?;
        let signing = SigningService::new(documents.clone(), artifacts.clone(), db.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                documents,
                artifacts,
                db,
                signing,
            }),
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the source document store
    pub fn documents(&self) -> &FileStore {
        &self.inner.documents
    }

    /// Get the signed artifact store
    pub fn artifacts(&self) -> &FileStore {
        &self.inner.artifacts
    }

    /// Get the database pool
    pub fn db(&self) -> &SqlitePool {
        &self.inner.db
    }

    /// Get the signing service
    pub fn signing(&self) -> &SigningService {
        &self.inner.signing
    }
}
