//! Synchronized key-value tree contract.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::watch;

use crate::result::AppResult;
use crate::types::path::StorePath;

/// A live view of the full value at one path.
///
/// Every change replaces the previous value wholesale; the receiver always
/// holds the latest value, never a diff.
pub type Subscription = watch::Receiver<Value>;

/// Trait for realtime store backends (in-memory or hosted).
///
/// The store is the sole source of truth. Writes are last-write-wins per
/// path and never partial; a removed node reads back as `Value::Null`.
#[async_trait]
pub trait SyncStore: Send + Sync + std::fmt::Debug + 'static {
    /// Subscribe to the value at `path`. The returned receiver already holds
    /// the current value and is updated on every change below `path`.
    async fn subscribe(&self, path: &StorePath) -> AppResult<Subscription>;

    /// Read the current value at `path` once.
    async fn read(&self, path: &StorePath) -> AppResult<Value>;

    /// Replace the value at `path`. Fails with `WriteFailed` on network or
    /// permission errors.
    async fn write(&self, path: &StorePath, value: Value) -> AppResult<()>;

    /// Reserve a fresh, time-ordered child key under `path` and return the
    /// child path. Nothing is written until [`SyncStore::write`] is called.
    async fn append(&self, path: &StorePath) -> AppResult<StorePath>;

    /// Remove the node at `path`.
    async fn remove(&self, path: &StorePath) -> AppResult<()> {
        self.write(path, Value::Null).await
    }

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
