//! Presence heartbeat entries.

pub mod model;

pub use model::{PresenceEntry, PresenceSnapshot};
