//! Notification value objects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::time::EpochMillis;

use super::kind::NotificationKind;
use crate::snapshot::Decoded;

/// The stored payload under `notifications/<id>`; the id is the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    /// Human-readable message.
    pub message: String,
    /// When the event was published.
    pub timestamp: EpochMillis,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// One activity feed event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Child key in the feed (time-ordered).
    pub id: String,
    /// Human-readable message.
    pub message: String,
    /// When the event was published.
    pub timestamp: EpochMillis,
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

impl Notification {
    /// Combine a stored record with its key.
    pub fn from_record(id: impl Into<String>, record: NotificationRecord) -> Self {
        Self {
            id: id.into(),
            message: record.message,
            timestamp: record.timestamp,
            kind: record.kind,
        }
    }

    /// The payload to store for this notification.
    pub fn record(&self) -> NotificationRecord {
        NotificationRecord {
            message: self.message.clone(),
            timestamp: self.timestamp,
            kind: self.kind,
        }
    }
}

/// Every notification in the feed, mirrored from `notifications`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    /// An empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from already-decoded notifications.
    pub fn from_entries(entries: Vec<Notification>) -> Self {
        Self { entries }
    }

    /// Decode the `notifications` subtree; unknown kinds and missing
    /// fields are rejected per entry.
    pub fn from_value(value: &Value) -> AppResult<Decoded<Self>> {
        let map = match value {
            Value::Null => return Ok(Decoded::clean(Self::new())),
            Value::Object(map) => map,
            other => {
                return Err(AppError::malformed(format!(
                    "Notifications must be an object, got {other}"
                )));
            }
        };

        let mut decoded = Decoded::clean(Self::new());
        for (id, payload) in map {
            match serde_json::from_value::<NotificationRecord>(payload.clone()) {
                Ok(record) => decoded
                    .value
                    .entries
                    .push(Notification::from_record(id.clone(), record)),
                Err(_) => decoded.rejected.push(id.clone()),
            }
        }
        Ok(decoded)
    }

    /// Append one notification locally.
    pub fn push(&mut self, notification: Notification) {
        self.entries.push(notification);
    }

    /// Iterate over every notification in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    /// Number of notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_rejects_unknown_kind() {
        let decoded = NotificationLog::from_value(&json!({
            "n1": {"message": "Ana joined the vote", "timestamp": 1, "type": "user"},
            "n2": {"message": "???", "timestamp": 2, "type": "reaction"},
        }))
        .unwrap();
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.rejected, vec!["n2".to_string()]);
    }

    #[test]
    fn test_record_serializes_type_field() {
        let notification = Notification {
            id: "n1".into(),
            message: "m".into(),
            timestamp: 7,
            kind: NotificationKind::Vote,
        };
        let json = serde_json::to_value(notification.record()).unwrap();
        assert_eq!(json, json!({"message": "m", "timestamp": 7, "type": "vote"}));
    }
}
