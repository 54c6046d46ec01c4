//! Activity feed: append-only notifications with session-relative recency.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use votehub_core::config::FeedConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::SyncStore;
use votehub_core::types::time::{EpochMillis, now_millis};
use votehub_entity::{Notification, NotificationKind, NotificationLog};
use votehub_store::paths;

/// Local mirror of the `notifications` subtree.
#[derive(Debug)]
pub struct ActivityFeed {
    store: Arc<dyn SyncStore>,
    mirror: RwLock<NotificationLog>,
    /// Maximum entries returned by [`ActivityFeed::recent`].
    max_recent: usize,
    /// How long a vote event counts as fresh for a celebration.
    celebration_window_ms: i64,
}

impl ActivityFeed {
    /// Create a feed backed by `store`.
    pub fn new(store: Arc<dyn SyncStore>, config: &FeedConfig) -> Self {
        Self {
            store,
            mirror: RwLock::new(NotificationLog::new()),
            max_recent: config.max_recent,
            celebration_window_ms: config.celebration_window_ms,
        }
    }

    /// Append a notification stamped with the current time.
    pub async fn publish(&self, message: &str, kind: NotificationKind) -> AppResult<Notification> {
        self.publish_at(message, kind, now_millis()).await
    }

    /// Append a notification stamped with `timestamp`.
    pub async fn publish_at(
        &self,
        message: &str,
        kind: NotificationKind,
        timestamp: EpochMillis,
    ) -> AppResult<Notification> {
        let path = self.store.append(&paths::notifications()).await?;
        let id = path
            .last_segment()
            .ok_or_else(|| AppError::internal("Store returned an empty child path"))?
            .to_string();

        let notification = Notification {
            id,
            message: message.to_string(),
            timestamp,
            kind,
        };
        let payload = serde_json::to_value(notification.record())?;
        self.store.write(&path, payload).await?;

        self.mirror
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification.clone());

        debug!(id = %notification.id, kind = %kind, "Notification published");
        Ok(notification)
    }

    /// Notifications strictly newer than `since`, newest first, capped.
    pub fn recent(&self, since: EpochMillis) -> Vec<Notification> {
        let mut entries: Vec<Notification> = self
            .read()
            .iter()
            .filter(|n| n.timestamp > since)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        entries.truncate(self.max_recent);
        entries
    }

    /// Vote events published inside the celebration window ending at `now`.
    pub fn celebrations(&self, now: EpochMillis) -> Vec<Notification> {
        let mut entries: Vec<Notification> = self
            .read()
            .iter()
            .filter(|n| n.kind == NotificationKind::Vote)
            .filter(|n| n.timestamp <= now && now - n.timestamp < self.celebration_window_ms)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// Number of notifications mirrored locally.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing has been mirrored yet.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Replace the mirror with a value pushed by the store.
    pub fn apply_snapshot(&self, value: &Value) -> AppResult<Vec<String>> {
        let decoded = NotificationLog::from_value(value)?;
        if decoded.has_rejections() {
            warn!(rejected = ?decoded.rejected, "Dropped malformed notifications");
        }
        debug!(entries = decoded.value.len(), "Applied activity snapshot");
        *self.mirror.write().unwrap_or_else(|e| e.into_inner()) = decoded.value;
        Ok(decoded.rejected)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, NotificationLog> {
        self.mirror.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use votehub_core::error::ErrorKind;
    use votehub_store::memory::MemoryStore;

    fn feed() -> (Arc<MemoryStore>, ActivityFeed) {
        let store = Arc::new(MemoryStore::new());
        let feed = ActivityFeed::new(store.clone(), &FeedConfig::default());
        (store, feed)
    }

    #[tokio::test]
    async fn test_recent_caps_and_excludes_since() {
        let (_store, feed) = feed();
        let mut published = Vec::new();
        for i in 1..=15 {
            let n = feed
                .publish_at(&format!("event {i}"), NotificationKind::User, 1_000 + i)
                .await
                .unwrap();
            published.push(n);
        }

        let since = published[4].timestamp;
        let recent = feed.recent(since);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].message, "event 15");
        assert_eq!(recent[9].message, "event 6");
        assert!(recent.iter().all(|n| n.timestamp > since));
        assert!(recent.windows(2).all(|w| w[0].timestamp > w[1].timestamp));
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_no_backlog() {
        let (_store, feed) = feed();
        feed.publish_at("old", NotificationKind::User, 100).await.unwrap();
        assert!(feed.recent(100).is_empty());
        feed.publish_at("new", NotificationKind::Vote, 101).await.unwrap();
        assert_eq!(feed.recent(100).len(), 1);
    }

    #[tokio::test]
    async fn test_publish_writes_record() {
        let (store, feed) = feed();
        let n = feed.publish_at("hi", NotificationKind::Submission, 42).await.unwrap();
        let stored = store
            .read(&paths::notifications().child(&n.id))
            .await
            .unwrap();
        assert_eq!(stored, json!({"message": "hi", "timestamp": 42, "type": "submission"}));
    }

    #[tokio::test]
    async fn test_publish_failure_leaves_mirror() {
        let (store, feed) = feed();
        store.set_offline(true);
        let err = feed.publish("hi", NotificationKind::User).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::WriteFailed);
        assert!(feed.is_empty());
    }

    #[tokio::test]
    async fn test_celebrations_window() {
        let (_store, feed) = feed();
        feed.publish_at("vote old", NotificationKind::Vote, 1_000).await.unwrap();
        feed.publish_at("vote new", NotificationKind::Vote, 5_500).await.unwrap();
        feed.publish_at("joined", NotificationKind::User, 5_900).await.unwrap();

        let fresh = feed.celebrations(6_000);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].message, "vote new");
        assert!(feed.celebrations(10_500).is_empty());
    }

    #[test]
    fn test_apply_snapshot_drops_unknown_kinds() {
        let (_store, feed) = feed();
        let rejected = feed
            .apply_snapshot(&json!({
                "a": {"message": "ok", "timestamp": 5, "type": "vote"},
                "b": {"message": "bad", "timestamp": 6, "type": "gossip"},
            }))
            .unwrap();
        assert_eq!(rejected, vec!["b".to_string()]);
        assert_eq!(feed.recent(0).len(), 1);
    }
}
