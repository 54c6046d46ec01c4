//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::broadcast;

use votehub_core::config::AppConfig;
use votehub_core::result::AppResult;
use votehub_entity::{Catalog, ItemKey};
use votehub_realtime::{SessionUpdate, VotingSession};
use votehub_security::DefaultGuard;
use votehub_store::memory::MemoryStore;

/// Test application context: one shared in-memory store that every
/// session joins, as browsers share one hosted database.
pub struct TestApp {
    /// The shared store
    pub store: Arc<MemoryStore>,
    /// Application config
    pub config: AppConfig,
    /// The naming catalog
    pub catalog: Arc<Catalog>,
}

impl TestApp {
    /// Create a test application with default policy and an empty store
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create a test application with a custom policy
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            config,
            catalog: Arc::new(Catalog::seeded()),
        }
    }

    /// Create a test application whose store already holds `tree`
    pub fn with_tree(tree: Value) -> Self {
        Self {
            store: Arc::new(MemoryStore::with_tree(tree)),
            ..Self::new()
        }
    }

    /// Open a session for `voter`
    pub async fn join(&self, voter: &str) -> AppResult<VotingSession> {
        VotingSession::open(
            self.store.clone(),
            Arc::new(DefaultGuard::new(&self.config)),
            self.catalog.clone(),
            &self.config,
            voter,
        )
        .await
    }
}

/// Parse an item key
pub fn key(raw: &str) -> ItemKey {
    ItemKey::parse(raw).expect("valid item key")
}

/// Wait until `check` holds, polling the session's mirrors
pub async fn eventually(mut check: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Wait for the first update matching `matches`
pub async fn wait_for(
    rx: &mut broadcast::Receiver<SessionUpdate>,
    matches: impl Fn(&SessionUpdate) -> bool,
) -> SessionUpdate {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            match rx.recv().await {
                Ok(update) if matches(&update) => return update,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("updates closed"),
            }
        }
    })
    .await
    .expect("update not received in time")
}
