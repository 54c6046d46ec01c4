//! Wall-clock timestamps as epoch milliseconds.

use chrono::Utc;

/// Milliseconds since the Unix epoch, the timestamp unit stored in the tree.
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    Utc::now().timestamp_millis()
}
