//! Activity feed configuration.

use serde::{Deserialize, Serialize};

/// Activity feed view settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Number of most recent notifications a consumer keeps.
    #[serde(default = "default_max_recent")]
    pub max_recent: usize,
    /// A `vote` event younger than this triggers the celebration hook.
    #[serde(default = "default_celebration_window")]
    pub celebration_window_ms: i64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            max_recent: default_max_recent(),
            celebration_window_ms: default_celebration_window(),
        }
    }
}

fn default_max_recent() -> usize {
    10
}

fn default_celebration_window() -> i64 {
    5_000
}
