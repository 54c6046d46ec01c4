//! Server-sent event decoding for Realtime Database streaming.
//!
//! A streaming `GET` delivers frames such as:
//!
//! ```text
//! event: put
//! data: {"path": "/Ana", "data": {"speed-TurboFlow": true}}
//! ```
//!
//! `put` replaces the node at `path` (relative to the subscribed location),
//! `patch` merges children into it.

use serde::Deserialize;
use serde_json::{Map, Value};

use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::types::path::StorePath;

use crate::tree;

/// One raw frame: event name plus joined data lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// The `event:` field; `message` when absent.
    pub event: String,
    /// The `data:` lines joined with `\n`.
    pub data: String,
}

/// Incremental frame decoder; feed it chunks as they arrive.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return every frame it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        if self.buffer.contains('\r') {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let mut frames = Vec::new();
        while let Some(end) = self.buffer.find("\n\n") {
            let block: String = self.buffer.drain(..end + 2).collect();
            if let Some(frame) = parse_block(&block) {
                frames.push(frame);
            }
        }
        frames
    }
}

fn parse_block(block: &str) -> Option<SseFrame> {
    let mut event = None;
    let mut data: Vec<&str> = Vec::new();

    for line in block.lines() {
        if line.is_empty() || line.starts_with(':') {
            continue;
        }
        let (field, value) = line.split_once(':').unwrap_or((line, ""));
        let value = value.strip_prefix(' ').unwrap_or(value);
        match field {
            "event" => event = Some(value.to_string()),
            "data" => data.push(value),
            _ => {}
        }
    }

    if event.is_none() && data.is_empty() {
        return None;
    }

    Some(SseFrame {
        event: event.unwrap_or_else(|| "message".to_string()),
        data: data.join("\n"),
    })
}

#[derive(Debug, Deserialize)]
struct PathData {
    path: String,
    data: Value,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// Replace the node at a relative path.
    Put {
        /// Path relative to the subscribed location.
        path: StorePath,
        /// New value.
        data: Value,
    },
    /// Merge children into the node at a relative path.
    Patch {
        /// Path relative to the subscribed location.
        path: StorePath,
        /// Children to merge.
        data: Map<String, Value>,
    },
    /// Connection heartbeat.
    KeepAlive,
    /// The server cancelled the stream (rules no longer allow reading).
    Cancel,
    /// The credential expired or was revoked.
    AuthRevoked,
}

impl StreamEvent {
    /// Decode a frame, rejecting unknown events and malformed payloads.
    pub fn from_frame(frame: &SseFrame) -> AppResult<Self> {
        match frame.event.as_str() {
            "put" | "patch" => {
                let payload: PathData = serde_json::from_str(&frame.data)
                    .map_err(|e| AppError::malformed(format!("Invalid {} payload: {e}", frame.event)))?;
                let path = StorePath::parse(&payload.path)?;
                if frame.event == "put" {
                    Ok(Self::Put {
                        path,
                        data: payload.data,
                    })
                } else {
                    match payload.data {
                        Value::Object(data) => Ok(Self::Patch { path, data }),
                        other => Err(AppError::malformed(format!(
                            "Patch data must be an object, got {other}"
                        ))),
                    }
                }
            }
            "keep-alive" => Ok(Self::KeepAlive),
            "cancel" => Ok(Self::Cancel),
            "auth_revoked" => Ok(Self::AuthRevoked),
            other => Err(AppError::malformed(format!("Unknown stream event '{other}'"))),
        }
    }

    /// Apply a `put`/`patch` to the local copy of the subscribed value.
    ///
    /// Returns `true` when the value may have changed.
    pub fn apply(self, local: &mut Value) -> bool {
        match self {
            Self::Put { path, data } => {
                tree::set_at(local, &path, data);
                true
            }
            Self::Patch { path, data } => {
                tree::merge_at(local, &path, data);
                true
            }
            Self::KeepAlive | Self::Cancel | Self::AuthRevoked => false,
        }
    }
}
