//! Presence tracker: heartbeats out, a read-time freshness filter in.

use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use votehub_core::config::PresenceConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::SyncStore;
use votehub_core::types::path::sanitize_segment;
use votehub_core::types::time::{EpochMillis, now_millis};
use votehub_entity::{PresenceEntry, PresenceSnapshot};
use votehub_store::paths;

/// Tracks the last heartbeat of every voter.
///
/// Stale entries are never removed; [`PresenceTracker::live_users`] simply
/// leaves them out.
#[derive(Debug)]
pub struct PresenceTracker {
    store: Arc<dyn SyncStore>,
    mirror: RwLock<PresenceSnapshot>,
    /// Entries older than this are not live.
    freshness_window_ms: i64,
}

impl PresenceTracker {
    /// Create a tracker backed by `store`.
    pub fn new(store: Arc<dyn SyncStore>, config: &PresenceConfig) -> Self {
        Self {
            store,
            mirror: RwLock::new(PresenceSnapshot::new()),
            freshness_window_ms: config.freshness_window_ms(),
        }
    }

    /// Record that `voter` is active now.
    pub async fn heartbeat(&self, voter: &str) -> AppResult<PresenceEntry> {
        self.heartbeat_at(voter, now_millis()).await
    }

    /// Record that `voter` was active at `now`.
    pub async fn heartbeat_at(&self, voter: &str, now: EpochMillis) -> AppResult<PresenceEntry> {
        let entry = PresenceEntry {
            name: voter.to_string(),
            last_active: now,
        };
        let payload = serde_json::to_value(&entry)
            .map_err(|e| AppError::internal(format!("Failed to encode presence entry: {e}")))?;

        self.store.write(&paths::presence(voter), payload).await?;
        self.mirror
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .upsert(sanitize_segment(voter), entry.clone());

        debug!(voter, last_active = now, "Heartbeat recorded");
        Ok(entry)
    }

    /// Sanitized identities whose last heartbeat is inside the freshness window.
    pub fn live_users(&self, now: EpochMillis) -> BTreeSet<String> {
        self.read()
            .iter()
            .filter(|(_, entry)| entry.is_fresh(now, self.freshness_window_ms))
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// The configured freshness window in milliseconds.
    pub fn freshness_window_ms(&self) -> i64 {
        self.freshness_window_ms
    }

    /// A copy of every tracked entry, stale ones included.
    pub fn snapshot(&self) -> PresenceSnapshot {
        self.read().clone()
    }

    /// Replace the mirror with a value pushed by the store.
    pub fn apply_snapshot(&self, value: &Value) -> AppResult<Vec<String>> {
        let decoded = PresenceSnapshot::from_value(value)?;
        if decoded.has_rejections() {
            warn!(rejected = ?decoded.rejected, "Dropped malformed presence entries");
        }
        debug!(entries = decoded.value.len(), "Applied presence snapshot");
        *self.mirror.write().unwrap_or_else(|e| e.into_inner()) = decoded.value;
        Ok(decoded.rejected)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, PresenceSnapshot> {
        self.mirror.read().unwrap_or_else(|e| e.into_inner())
    }
}
