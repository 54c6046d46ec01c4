//! Submission value objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::time::EpochMillis;

use crate::item::ItemKey;
use crate::snapshot::Decoded;

/// A submitted idea as stored under `userSubmissions/<category>/<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// The submitted item name.
    pub name: String,
    /// Display name of whoever submitted it.
    pub submitter: String,
    /// Creation time.
    pub timestamp: EpochMillis,
}

impl Submission {
    /// Decode one stored submission, rejecting missing or mistyped fields.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        let submission: Self = serde_json::from_value(value.clone())
            .map_err(|e| AppError::malformed(format!("Invalid submission: {e}")))?;
        if submission.name.trim().is_empty() {
            return Err(AppError::malformed("Submission name is empty"));
        }
        Ok(submission)
    }
}

/// A stored submission together with its location in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEntry {
    /// Child key under the category (time-ordered).
    pub id: String,
    /// Category the submission belongs to.
    pub category_id: String,
    /// The stored record.
    pub submission: Submission,
}

impl SubmissionEntry {
    /// The vote key of the submitted item.
    pub fn item_key(&self) -> ItemKey {
        ItemKey::contributed(&self.category_id, &self.submission.name)
    }
}

/// Category id → submissions in insertion order, mirrored from `userSubmissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSnapshot {
    by_category: BTreeMap<String, Vec<SubmissionEntry>>,
}

impl SubmissionSnapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `userSubmissions` subtree.
    ///
    /// Each category may be an object keyed by push id or an array; malformed
    /// entries are dropped and reported as `category/id`.
    pub fn from_value(value: &Value) -> AppResult<Decoded<Self>> {
        let map = match value {
            Value::Null => return Ok(Decoded::clean(Self::new())),
            Value::Object(map) => map,
            other => {
                return Err(AppError::malformed(format!(
                    "Submissions must be an object, got {other}"
                )));
            }
        };

        let mut decoded = Decoded::clean(Self::new());
        for (category_id, entries) in map {
            let children: Vec<(String, &Value)> = match entries {
                Value::Object(children) => {
                    children.iter().map(|(k, v)| (k.clone(), v)).collect()
                }
                Value::Array(items) => items
                    .iter()
                    .enumerate()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(i, v)| (format!("{i:08}"), v))
                    .collect(),
                Value::Null => continue,
                _ => {
                    decoded.rejected.push(category_id.clone());
                    continue;
                }
            };

            let mut list = Vec::with_capacity(children.len());
            for (id, child) in children {
                match Submission::from_value(child) {
                    Ok(submission) => list.push(SubmissionEntry {
                        id,
                        category_id: category_id.clone(),
                        submission,
                    }),
                    Err(_) => decoded.rejected.push(format!("{category_id}/{id}")),
                }
            }
            list.sort_by(|a, b| a.id.cmp(&b.id));
            decoded.value.by_category.insert(category_id.clone(), list);
        }
        Ok(decoded)
    }

    /// Submissions of one category in insertion order.
    pub fn for_category(&self, category_id: &str) -> &[SubmissionEntry] {
        self.by_category
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Find one submission by category and id.
    pub fn find(&self, category_id: &str, id: &str) -> Option<&SubmissionEntry> {
        self.for_category(category_id).iter().find(|e| e.id == id)
    }

    /// Append an entry locally.
    pub fn push(&mut self, entry: SubmissionEntry) {
        let list = self.by_category.entry(entry.category_id.clone()).or_default();
        list.push(entry);
        list.sort_by(|a, b| a.id.cmp(&b.id));
    }

    /// Remove an entry locally, returning it.
    pub fn remove(&mut self, category_id: &str, id: &str) -> Option<SubmissionEntry> {
        let list = self.by_category.get_mut(category_id)?;
        let idx = list.iter().position(|e| e.id == id)?;
        Some(list.remove(idx))
    }

    /// Iterate over every entry across categories.
    pub fn iter(&self) -> impl Iterator<Item = &SubmissionEntry> {
        self.by_category.values().flatten()
    }

    /// Total submissions across categories.
    pub fn total(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_orders_by_id() {
        let decoded = SubmissionSnapshot::from_value(&json!({
            "speed": {
                "b": {"name": "Rayo", "submitter": "Ana", "timestamp": 2},
                "a": {"name": "Bala", "submitter": "Luis", "timestamp": 1},
            }
        }))
        .unwrap();
        let names: Vec<_> = decoded
            .value
            .for_category("speed")
            .iter()
            .map(|e| e.submission.name.as_str())
            .collect();
        assert_eq!(names, vec!["Bala", "Rayo"]);
    }

    #[test]
    fn test_decode_rejects_missing_fields() {
        let decoded = SubmissionSnapshot::from_value(&json!({
            "speed": {
                "a": {"name": "Bala", "submitter": "Luis", "timestamp": 1},
                "b": {"name": "Rayo"},
            }
        }))
        .unwrap();
        assert_eq!(decoded.value.total(), 1);
        assert_eq!(decoded.rejected, vec!["speed/b".to_string()]);
    }

    #[test]
    fn test_decode_array_form() {
        let decoded = SubmissionSnapshot::from_value(&json!({
            "modular": [
                {"name": "Lego", "submitter": "Ana", "timestamp": 1},
                null,
                {"name": "Bloque", "submitter": "Ana", "timestamp": 3},
            ]
        }))
        .unwrap();
        assert_eq!(decoded.value.for_category("modular").len(), 2);
    }

    #[test]
    fn test_item_key_uses_contributed_prefix() {
        let entry = SubmissionEntry {
            id: "x".into(),
            category_id: "speed".into(),
            submission: Submission {
                name: "Rayo".into(),
                submitter: "Ana".into(),
                timestamp: 0,
            },
        };
        assert_eq!(entry.item_key().to_string(), "speed-user-Rayo");
    }

    #[test]
    fn test_total_counts_all_categories() {
        let mut snapshot = SubmissionSnapshot::new();
        for (cat, id) in [("speed", "1"), ("speed", "2"), ("modular", "3")] {
            snapshot.push(SubmissionEntry {
                id: id.into(),
                category_id: cat.into(),
                submission: Submission {
                    name: format!("n{id}"),
                    submitter: "Ana".into(),
                    timestamp: 0,
                },
            });
        }
        assert_eq!(snapshot.total(), 3);
        assert!(snapshot.remove("speed", "1").is_some());
        assert_eq!(snapshot.total(), 2);
    }
}
