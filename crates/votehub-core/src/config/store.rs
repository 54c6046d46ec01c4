//! Shared store connection configuration.

use serde::{Deserialize, Serialize};

/// Which synchronized store backs the voting session, and how to reach it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend name: `"memory"` or `"firebase"`.
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Realtime Database URL, e.g. `https://my-app-default-rtdb.firebaseio.com`.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional database secret or ID token appended as `auth=`.
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Buffer size for session update broadcast channels.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Timeout for one-shot REST requests, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            auth_token: None,
            channel_buffer_size: default_channel_buffer(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_backend() -> String {
    "memory".to_string()
}

fn default_channel_buffer() -> usize {
    64
}

fn default_request_timeout() -> u64 {
    10
}
