//! Presence heartbeat configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Heartbeat cadence and the freshness window that defines "active now".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceConfig {
    /// Interval between heartbeats while a session is open.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// A presence entry older than this is no longer live.
    #[serde(default = "default_freshness_window")]
    pub freshness_window_seconds: u64,
}

impl PresenceConfig {
    /// Heartbeat interval as a [`Duration`].
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds)
    }

    /// Freshness window in epoch milliseconds.
    pub fn freshness_window_ms(&self) -> i64 {
        (self.freshness_window_seconds as i64).saturating_mul(1_000)
    }
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval_seconds: default_heartbeat_interval(),
            freshness_window_seconds: default_freshness_window(),
        }
    }
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_freshness_window() -> u64 {
    600
}
