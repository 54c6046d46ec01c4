//! Presence value objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::time::EpochMillis;

use crate::snapshot::Decoded;

/// The last heartbeat of one voter, stored under `activeUsers/<sanitized name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    /// Verbatim voter display name.
    pub name: String,
    /// Time of the last heartbeat.
    #[serde(rename = "lastActive")]
    pub last_active: EpochMillis,
}

impl PresenceEntry {
    /// Decode one entry, rejecting a missing or non-numeric `lastActive`.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| AppError::malformed(format!("Invalid presence entry: {e}")))
    }

    /// Whether the entry is live at `now` for the given window.
    pub fn is_fresh(&self, now: EpochMillis, freshness_window_ms: i64) -> bool {
        now - self.last_active < freshness_window_ms
    }
}

/// Sanitized identity → presence entry, mirrored from `activeUsers`.
///
/// Stale entries stay here; freshness is decided when reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresenceSnapshot {
    entries: BTreeMap<String, PresenceEntry>,
}

impl PresenceSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `activeUsers` subtree.
    pub fn from_value(value: &Value) -> AppResult<Decoded<Self>> {
        let map = match value {
            Value::Null => return Ok(Decoded::clean(Self::new())),
            Value::Object(map) => map,
            other => {
                return Err(AppError::malformed(format!(
                    "Presence must be an object, got {other}"
                )));
            }
        };

        let mut decoded = Decoded::clean(Self::new());
        for (key, entry) in map {
            match PresenceEntry::from_value(entry) {
                Ok(entry) => {
                    decoded.value.entries.insert(key.clone(), entry);
                }
                Err(_) => decoded.rejected.push(key.clone()),
            }
        }
        Ok(decoded)
    }

    /// Insert or refresh an entry locally.
    pub fn upsert(&mut self, key: impl Into<String>, entry: PresenceEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// The entry stored under `key`.
    pub fn get(&self, key: &str) -> Option<&PresenceEntry> {
        self.entries.get(key)
    }

    /// Iterate over `(sanitized identity, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PresenceEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of tracked entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_uses_camel_case_field() {
        let entry = PresenceEntry::from_value(&json!({"name": "Ana", "lastActive": 42})).unwrap();
        assert_eq!(entry.last_active, 42);
    }

    #[test]
    fn test_non_numeric_last_active_is_rejected() {
        let decoded = PresenceSnapshot::from_value(&json!({
            "Ana": {"name": "Ana", "lastActive": 10},
            "Luis": {"name": "Luis", "lastActive": {".sv": "timestamp"}},
        }))
        .unwrap();
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.rejected, vec!["Luis".to_string()]);
    }

    #[test]
    fn test_freshness_boundary_is_exclusive() {
        let entry = PresenceEntry {
            name: "Ana".into(),
            last_active: 1_000,
        };
        assert!(entry.is_fresh(1_999, 1_000));
        assert!(!entry.is_fresh(2_000, 1_000));
    }
}
