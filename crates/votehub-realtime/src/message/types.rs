//! Session update type definitions.

use serde::{Deserialize, Serialize};

use votehub_entity::Notification;

/// Something a session's local view changed in response to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionUpdate {
    /// The vote ledger mirror was replaced.
    LedgerChanged {
        /// Voters with a ballot in the new snapshot.
        voters: usize,
    },
    /// The submissions mirror was replaced.
    SubmissionsChanged {
        /// Submissions across all categories.
        total: usize,
    },
    /// The presence mirror was replaced.
    PresenceChanged {
        /// Voters currently live.
        live: usize,
    },
    /// The activity mirror was replaced.
    ActivityChanged {
        /// Notifications newer than the session start.
        recent: usize,
    },
    /// A fresh vote event arrived; a good moment for a celebration.
    Celebrate {
        /// The vote event.
        notification: Notification,
    },
    /// The session now acts for another voter.
    VoterChanged {
        /// The new voter.
        voter: String,
    },
}
