//! Ballot and ledger snapshot value objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use votehub_core::error::AppError;
use votehub_core::result::AppResult;

use crate::item::ItemKey;
use crate::snapshot::Decoded;

/// One voter's selections: item key → selected.
///
/// A missing key reads as `false`; a `false` entry is how a vote is retracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ballot {
    selections: BTreeMap<String, bool>,
}

impl Ballot {
    /// An empty ballot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a ballot payload: an object of booleans, or `null` for empty.
    pub fn from_value(value: &Value) -> AppResult<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(map) => {
                let mut selections = BTreeMap::new();
                for (key, selected) in map {
                    let selected = selected.as_bool().ok_or_else(|| {
                        AppError::malformed(format!("Ballot entry '{key}' is not a boolean"))
                    })?;
                    selections.insert(key.clone(), selected);
                }
                Ok(Self { selections })
            }
            other => Err(AppError::malformed(format!(
                "Ballot must be an object, got {other}"
            ))),
        }
    }

    /// The selection for `key`, `false` when absent.
    pub fn get(&self, key: &ItemKey) -> bool {
        self.get_raw(&key.to_string())
    }

    /// The selection for a raw key string, `false` when absent.
    pub fn get_raw(&self, key: &str) -> bool {
        self.selections.get(key).copied().unwrap_or(false)
    }

    /// Set the selection for `key`.
    pub fn set(&mut self, key: &ItemKey, selected: bool) {
        self.selections.insert(key.to_string(), selected);
    }

    /// Raw keys currently selected, in key order.
    pub fn selected(&self) -> impl Iterator<Item = &str> {
        self.selections
            .iter()
            .filter(|(_, selected)| **selected)
            .map(|(key, _)| key.as_str())
    }

    /// Number of `true` entries.
    pub fn total(&self) -> usize {
        self.selections.values().filter(|s| **s).count()
    }

    /// Whether at least one entry is `true`.
    pub fn has_any_vote(&self) -> bool {
        self.selections.values().any(|s| *s)
    }

    /// Iterate over every entry, including retracted ones.
    pub fn entries(&self) -> impl Iterator<Item = (&str, bool)> {
        self.selections.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Voter identity → ballot, as mirrored from the `votes` subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LedgerSnapshot {
    ballots: BTreeMap<String, Ballot>,
}

impl LedgerSnapshot {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `votes` subtree. Ballots that are not objects of
    /// booleans are dropped and reported.
    pub fn from_value(value: &Value) -> AppResult<Decoded<Self>> {
        let map = match value {
            Value::Null => return Ok(Decoded::clean(Self::new())),
            Value::Object(map) => map,
            other => {
                return Err(AppError::malformed(format!(
                    "Vote ledger must be an object, got {other}"
                )));
            }
        };

        let mut decoded = Decoded::clean(Self::new());
        for (voter, ballot) in map {
            match Ballot::from_value(ballot) {
                Ok(ballot) => {
                    decoded.value.ballots.insert(voter.clone(), ballot);
                }
                Err(_) => decoded.rejected.push(voter.clone()),
            }
        }
        Ok(decoded)
    }

    /// The ballot of `voter`, if it exists.
    pub fn ballot(&self, voter: &str) -> Option<&Ballot> {
        self.ballots.get(voter)
    }

    /// Whether `voter` selected `key`.
    pub fn is_selected(&self, voter: &str, key: &ItemKey) -> bool {
        self.ballot(voter).is_some_and(|b| b.get(key))
    }

    /// Set one selection, creating the ballot if needed.
    pub fn set_vote(&mut self, voter: &str, key: &ItemKey, selected: bool) {
        self.ballots
            .entry(voter.to_string())
            .or_default()
            .set(key, selected);
    }

    /// Iterate over `(voter, ballot)` pairs in voter order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Ballot)> {
        self.ballots.iter().map(|(v, b)| (v.as_str(), b))
    }

    /// Number of ballots, including ones with no `true` entry.
    pub fn len(&self) -> usize {
        self.ballots.len()
    }

    /// Whether the ledger has no ballots.
    pub fn is_empty(&self) -> bool {
        self.ballots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_entry_reads_false() {
        let ballot = Ballot::new();
        assert!(!ballot.get(&ItemKey::seed("speed", "TurboFlow")));
    }

    #[test]
    fn test_ballot_rejects_non_boolean() {
        let err = Ballot::from_value(&json!({"speed-TurboFlow": 1})).unwrap_err();
        assert_eq!(err.kind, votehub_core::error::ErrorKind::MalformedPayload);
    }

    #[test]
    fn test_total_ignores_retracted() {
        let ballot = Ballot::from_value(&json!({
            "speed-TurboFlow": true,
            "speed-FlashFlow": false,
            "hispanic-AmigaAI": true,
        }))
        .unwrap();
        assert_eq!(ballot.total(), 2);
        assert_eq!(
            ballot.selected().collect::<Vec<_>>(),
            vec!["hispanic-AmigaAI", "speed-TurboFlow"]
        );
    }

    #[test]
    fn test_ledger_drops_malformed_ballots() {
        let decoded = LedgerSnapshot::from_value(&json!({
            "Ana": {"speed-TurboFlow": true},
            "Eve": "not a ballot",
        }))
        .unwrap();
        assert_eq!(decoded.value.len(), 1);
        assert_eq!(decoded.rejected, vec!["Eve".to_string()]);
    }

    #[test]
    fn test_ledger_null_is_empty() {
        let decoded = LedgerSnapshot::from_value(&Value::Null).unwrap();
        assert!(decoded.value.is_empty());
        assert!(!decoded.has_rejections());
    }

    #[test]
    fn test_ledger_rejects_non_object_root() {
        assert!(LedgerSnapshot::from_value(&json!([1, 2])).is_err());
    }
}
