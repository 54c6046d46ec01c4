//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use votehub_core::config::StoreConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::{Subscription, SyncStore};
use votehub_core::types::path::StorePath;

/// Store manager that wraps the configured backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner backend.
    inner: Arc<dyn SyncStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn SyncStore> = match config.backend.as_str() {
            #[cfg(feature = "firebase")]
            "firebase" => {
                info!("Initializing Firebase store backend");
                Arc::new(crate::firebase::FirebaseStore::connect(config)?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory store backend");
                Arc::new(crate::memory::MemoryStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown store backend: '{other}'. Supported: memory, firebase"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing backend (for testing).
    pub fn from_store(store: Arc<dyn SyncStore>) -> Self {
        Self { inner: store }
    }

    /// Get a reference to the inner backend.
    pub fn store(&self) -> &dyn SyncStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl SyncStore for StoreManager {
    async fn subscribe(&self, path: &StorePath) -> AppResult<Subscription> {
        self.inner.subscribe(path).await
    }

    async fn read(&self, path: &StorePath) -> AppResult<Value> {
        self.inner.read(path).await
    }

    async fn write(&self, path: &StorePath, value: Value) -> AppResult<()> {
        self.inner.write(path, value).await
    }

    async fn append(&self, path: &StorePath) -> AppResult<StorePath> {
        self.inner.append(path).await
    }

    async fn remove(&self, path: &StorePath) -> AppResult<()> {
        self.inner.remove(path).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}
