//! Rate limit configuration.

use serde::{Deserialize, Serialize};

/// A sliding-window quota: at most `max_actions` within `window_ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Maximum accepted actions inside one window.
    pub max_actions: usize,
    /// Window length in milliseconds.
    pub window_ms: i64,
}

impl RateLimitPolicy {
    /// Create a policy.
    pub const fn new(max_actions: usize, window_ms: i64) -> Self {
        Self {
            max_actions,
            window_ms,
        }
    }
}

/// Per-action rate limits, keyed by user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Vote toggles.
    #[serde(default = "default_vote")]
    pub vote: RateLimitPolicy,
    /// Idea submissions.
    #[serde(default = "default_submission")]
    pub submission: RateLimitPolicy,
    /// Activity feed notifications.
    #[serde(default = "default_notification")]
    pub notification: RateLimitPolicy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            vote: default_vote(),
            submission: default_submission(),
            notification: default_notification(),
        }
    }
}

fn default_vote() -> RateLimitPolicy {
    RateLimitPolicy::new(20, 60_000)
}

fn default_submission() -> RateLimitPolicy {
    RateLimitPolicy::new(5, 300_000)
}

fn default_notification() -> RateLimitPolicy {
    RateLimitPolicy::new(50, 60_000)
}
