//! Submission store: user-contributed items per category.

use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, info, warn};

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::store::SyncStore;
use votehub_core::types::time::now_millis;
use votehub_entity::{Catalog, Submission, SubmissionEntry, SubmissionSnapshot};
use votehub_store::paths;

/// Local mirror of the `userSubmissions` subtree.
#[derive(Debug)]
pub struct SubmissionStore {
    store: Arc<dyn SyncStore>,
    catalog: Arc<Catalog>,
    mirror: RwLock<SubmissionSnapshot>,
}

impl SubmissionStore {
    /// Create a submission store for the categories of `catalog`.
    pub fn new(store: Arc<dyn SyncStore>, catalog: Arc<Catalog>) -> Self {
        Self {
            store,
            catalog,
            mirror: RwLock::new(SubmissionSnapshot::new()),
        }
    }

    /// Append a submission to a category.
    ///
    /// Names are not deduplicated: every call creates a new entry, and
    /// entries with the same name share one vote key.
    pub async fn submit(
        &self,
        category_id: &str,
        name: &str,
        submitter: &str,
    ) -> AppResult<SubmissionEntry> {
        self.catalog.require(category_id)?;

        let path = self
            .store
            .append(&paths::category_submissions(category_id))
            .await?;
        let id = path
            .last_segment()
            .ok_or_else(|| AppError::internal("Store returned an empty child path"))?
            .to_string();

        let submission = Submission {
            name: name.to_string(),
            submitter: submitter.to_string(),
            timestamp: now_millis(),
        };
        self.store
            .write(&path, serde_json::to_value(&submission)?)
            .await?;

        let entry = SubmissionEntry {
            id,
            category_id: category_id.to_string(),
            submission,
        };
        self.mirror
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(entry.clone());

        info!(category = category_id, id = %entry.id, submitter, "Submission added");
        Ok(entry)
    }

    /// Remove a submission on behalf of its original submitter.
    pub async fn withdraw(
        &self,
        category_id: &str,
        entry_id: &str,
        requester: &str,
    ) -> AppResult<SubmissionEntry> {
        self.catalog.require(category_id)?;
        let entry = self.lookup(category_id, entry_id).await?;

        if entry.submission.submitter != requester {
            return Err(AppError::forbidden(format!(
                "Only {} can withdraw this submission",
                entry.submission.submitter
            )));
        }

        self.store
            .remove(&paths::submission(category_id, entry_id))
            .await?;
        self.mirror
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(category_id, entry_id);

        info!(category = category_id, id = entry_id, "Submission withdrawn");
        Ok(entry)
    }

    /// Submissions of one category in insertion order.
    pub fn for_category(&self, category_id: &str) -> Vec<SubmissionEntry> {
        self.read().for_category(category_id).to_vec()
    }

    /// Submitted items across all categories.
    pub fn total(&self) -> usize {
        self.read().total()
    }

    /// A copy of every submission.
    pub fn snapshot(&self) -> SubmissionSnapshot {
        self.read().clone()
    }

    /// Replace the mirror with a value pushed by the store.
    pub fn apply_snapshot(&self, value: &Value) -> AppResult<Vec<String>> {
        let decoded = SubmissionSnapshot::from_value(value)?;
        if decoded.has_rejections() {
            warn!(rejected = ?decoded.rejected, "Dropped malformed submissions");
        }
        debug!(entries = decoded.value.total(), "Applied submissions snapshot");
        *self.mirror.write().unwrap_or_else(|e| e.into_inner()) = decoded.value;
        Ok(decoded.rejected)
    }

    async fn lookup(&self, category_id: &str, entry_id: &str) -> AppResult<SubmissionEntry> {
        if let Some(entry) = self.read().find(category_id, entry_id) {
            return Ok(entry.clone());
        }

        let value = self
            .store
            .read(&paths::submission(category_id, entry_id))
            .await?;
        if value.is_null() {
            return Err(AppError::not_found(format!(
                "Submission '{entry_id}' not found in '{category_id}'"
            )));
        }

        Ok(SubmissionEntry {
            id: entry_id.to_string(),
            category_id: category_id.to_string(),
            submission: Submission::from_value(&value)?,
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SubmissionSnapshot> {
        self.mirror.read().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use votehub_core::error::ErrorKind;
    use votehub_store::memory::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, SubmissionStore) {
        let store = Arc::new(MemoryStore::new());
        let submissions = SubmissionStore::new(store.clone(), Arc::new(Catalog::seeded()));
        (store, submissions)
    }

    #[tokio::test]
    async fn test_submit_appends_in_order() {
        let (store, submissions) = setup();
        let a = submissions.submit("speed", "Rayo", "Ana").await.unwrap();
        let b = submissions.submit("speed", "Rayo", "Luis").await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.item_key(), b.item_key());
        assert_eq!(a.item_key().to_string(), "speed-user-Rayo");

        let listed = submissions.for_category("speed");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].submission.submitter, "Ana");
        assert_eq!(submissions.total(), 2);

        let stored = store.read(&paths::submission("speed", &a.id)).await.unwrap();
        assert_eq!(stored["name"], "Rayo");
        assert_eq!(stored["submitter"], "Ana");
    }

    #[tokio::test]
    async fn test_unknown_category_writes_nothing() {
        let (store, submissions) = setup();
        let err = submissions.submit("nope", "Rayo", "Ana").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownCategory);
        assert_eq!(store.dump(), Value::Null);
    }

    #[tokio::test]
    async fn test_withdraw_requires_submitter() {
        let (store, submissions) = setup();
        let entry = submissions.submit("speed", "Rayo", "Ana").await.unwrap();

        let err = submissions.withdraw("speed", &entry.id, "Luis").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        submissions.withdraw("speed", &entry.id, "Ana").await.unwrap();
        assert_eq!(submissions.total(), 0);
        assert_eq!(store.dump(), Value::Null);

        let err = submissions.withdraw("speed", &entry.id, "Ana").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_withdraw_falls_back_to_store() {
        let (store, submissions) = setup();
        let other = SubmissionStore::new(store.clone(), Arc::new(Catalog::seeded()));
        let entry = other.submit("modular", "Lego", "Luis").await.unwrap();

        let removed = submissions.withdraw("modular", &entry.id, "Luis").await.unwrap();
        assert_eq!(removed.submission.name, "Lego");
    }
}
