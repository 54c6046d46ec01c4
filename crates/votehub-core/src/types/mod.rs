//! Shared types used across VoteHub crates.

pub mod path;
pub mod time;

pub use path::{StorePath, StoreRoot, sanitize_segment};
pub use time::{EpochMillis, now_millis};
