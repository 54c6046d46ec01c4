//! Subscription tasks that keep local mirrors in step with the store.

use serde_json::Value;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use votehub_core::result::AppResult;
use votehub_core::traits::store::Subscription;
use votehub_core::types::path::StorePath;

/// Apply the current value of `rx` now, then every new value until
/// `cancel` fires or the store drops the channel.
///
/// A snapshot that fails to decode as a whole is logged and skipped; the
/// mirror keeps its previous value.
pub fn spawn_mirror<F>(
    path: StorePath,
    mut rx: Subscription,
    cancel: CancellationToken,
    apply: F,
) -> JoinHandle<()>
where
    F: Fn(&Value) -> AppResult<()> + Send + Sync + 'static,
{
    let initial = rx.borrow_and_update().clone();
    if let Err(e) = apply(&initial) {
        warn!(path = %path, error = %e, "Rejected initial snapshot");
    }

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                changed = rx.changed() => {
                    if changed.is_err() {
                        debug!(path = %path, "Store closed subscription");
                        break;
                    }
                }
            }

            let value = rx.borrow_and_update().clone();
            if let Err(e) = apply(&value) {
                warn!(path = %path, error = %e, "Rejected snapshot");
            }
        }
        debug!(path = %path, "Mirror task ended");
    })
}
