//! In-memory realtime tree with live subscriptions.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::watch;
use tracing::debug;

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::{Subscription, SyncStore};
use votehub_core::types::path::StorePath;

use crate::push_id::PushIdGenerator;
use crate::tree;

/// Process-local store. Every write fans out the new full value to each
/// subscriber whose path overlaps the written path, including the writer.
#[derive(Debug, Default)]
pub struct MemoryStore {
    /// The whole tree.
    root: RwLock<Value>,
    /// Subscribed path → latest value sender.
    watchers: DashMap<StorePath, watch::Sender<Value>>,
    /// When set, every write fails with `WriteFailed`.
    offline: AtomicBool,
    /// Child key generator for `append`.
    ids: PushIdGenerator,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `root`.
    pub fn with_tree(root: Value) -> Self {
        let store = Self::new();
        let mut tree = Value::Null;
        tree::set_at(&mut tree, &StorePath::tree(), root);
        *store.root.write().unwrap_or_else(|e| e.into_inner()) = tree;
        store
    }

    /// Simulate losing the connection: writes fail until set back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
        debug!(offline, "Memory store connectivity changed");
    }

    /// Whether writes currently fail.
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }

    /// A copy of the whole tree.
    pub fn dump(&self) -> Value {
        tree::get_at(&self.root_read(), &StorePath::tree())
    }

    /// Number of paths with at least one live subscriber.
    pub fn subscribed_paths(&self) -> usize {
        self.watchers
            .iter()
            .filter(|w| w.value().receiver_count() > 0)
            .count()
    }

    fn root_read(&self) -> std::sync::RwLockReadGuard<'_, Value> {
        self.root.read().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, written: &StorePath, root: &Value) {
        self.watchers
            .retain(|_, tx| tx.receiver_count() > 0);

        for watcher in self.watchers.iter() {
            if !watcher.key().overlaps(written) {
                continue;
            }
            let latest = tree::get_at(root, watcher.key());
            watcher.value().send_if_modified(|current| {
                if *current == latest {
                    false
                } else {
                    *current = latest;
                    true
                }
            });
        }
    }
}

#[async_trait]
impl SyncStore for MemoryStore {
    async fn subscribe(&self, path: &StorePath) -> AppResult<Subscription> {
        let current = tree::get_at(&self.root_read(), path);
        let rx = self
            .watchers
            .entry(path.clone())
            .or_insert_with(|| watch::channel(current).0)
            .subscribe();
        debug!(path = %path, "Subscribed to memory store path");
        Ok(rx)
    }

    async fn read(&self, path: &StorePath) -> AppResult<Value> {
        Ok(tree::get_at(&self.root_read(), path))
    }

    async fn write(&self, path: &StorePath, value: Value) -> AppResult<()> {
        if self.is_offline() {
            return Err(AppError::write_failed(format!(
                "Store is offline, write to {path} rejected"
            )));
        }

        let mut root = self.root.write().unwrap_or_else(|e| e.into_inner());
        tree::set_at(&mut root, path, value);
        self.notify(path, &root);
        debug!(path = %path, "Memory store write applied");
        Ok(())
    }

    async fn append(&self, path: &StorePath) -> AppResult<StorePath> {
        Ok(path.child(&self.ids.next_id()))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.is_offline())
    }
}
