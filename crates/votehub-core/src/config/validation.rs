//! Input bounds configuration.

use serde::{Deserialize, Serialize};

/// Length bounds enforced by the input guard. Minimums are always 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Maximum voter display name length, in characters.
    #[serde(default = "default_voter_name_max")]
    pub voter_name_max: usize,
    /// Maximum submitted idea name length, in characters.
    #[serde(default = "default_submission_name_max")]
    pub submission_name_max: usize,
    /// Maximum activity message length, in characters.
    #[serde(default = "default_message_max")]
    pub message_max: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            voter_name_max: default_voter_name_max(),
            submission_name_max: default_submission_name_max(),
            message_max: default_message_max(),
        }
    }
}

fn default_voter_name_max() -> usize {
    30
}

fn default_submission_name_max() -> usize {
    50
}

fn default_message_max() -> usize {
    200
}
