//! Vote ledger: every voter's ballot, mirrored locally.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::SyncStore;
use votehub_entity::{Ballot, ItemKey, LedgerSnapshot};
use votehub_store::paths;

/// The result of a successful toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    /// The toggled item.
    pub item_key: ItemKey,
    /// The selection after the toggle.
    pub selected: bool,
    /// Whether this toggle cast a vote (false → true).
    pub cast: bool,
}

/// Local mirror of the `votes` subtree with optimistic writes.
#[derive(Debug)]
pub struct VoteLedger {
    store: Arc<dyn SyncStore>,
    mirror: RwLock<LedgerSnapshot>,
}

impl VoteLedger {
    /// Create an empty ledger backed by `store`.
    pub fn new(store: Arc<dyn SyncStore>) -> Self {
        Self {
            store,
            mirror: RwLock::new(LedgerSnapshot::new()),
        }
    }

    /// Flip the selection of `item_key` in `voter`'s ballot.
    ///
    /// The local mirror is updated before the write is sent. When the write
    /// fails the mirror is restored to the previous selection and the
    /// `WriteFailed` error is returned. Keys the store would rewrite are
    /// rejected before anything changes.
    pub async fn toggle_vote(&self, voter: &str, item_key: &ItemKey) -> AppResult<ToggleOutcome> {
        if !item_key.is_storable() {
            return Err(AppError::validation(format!(
                "Item key '{item_key}' contains characters that cannot be stored"
            )));
        }

        let previous = {
            let mut mirror = self.mirror.write().unwrap_or_else(|e| e.into_inner());
            let previous = mirror.is_selected(voter, item_key);
            mirror.set_vote(voter, item_key, !previous);
            previous
        };
        let selected = !previous;

        let path = paths::vote(voter, &item_key.to_string());
        if let Err(e) = self.store.write(&path, Value::Bool(selected)).await {
            warn!(voter, item = %item_key, error = %e, "Vote write failed, rolling back");
            self.mirror
                .write()
                .unwrap_or_else(|e| e.into_inner())
                .set_vote(voter, item_key, previous);
            return Err(e);
        }

        debug!(voter, item = %item_key, selected, "Vote toggled");
        Ok(ToggleOutcome {
            item_key: item_key.clone(),
            selected,
            cast: selected && !previous,
        })
    }

    /// `voter`'s ballot; empty when the voter has never voted.
    pub fn get_ballot(&self, voter: &str) -> Ballot {
        self.read().ballot(voter).cloned().unwrap_or_default()
    }

    /// A copy of the whole ledger.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.read().clone()
    }

    /// Replace the mirror with a value pushed by the store.
    ///
    /// Malformed ballots are dropped; their voter keys are returned.
    pub fn apply_snapshot(&self, value: &Value) -> AppResult<Vec<String>> {
        let decoded = LedgerSnapshot::from_value(value)?;
        if decoded.has_rejections() {
            warn!(rejected = ?decoded.rejected, "Dropped malformed ballots");
        }
        debug!(voters = decoded.value.len(), "Applied ledger snapshot");
        *self.mirror.write().unwrap_or_else(|e| e.into_inner()) = decoded.value;
        Ok(decoded.rejected)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LedgerSnapshot> {
        self.mirror.read().unwrap_or_else(|e| e.into_inner())
    }
}
