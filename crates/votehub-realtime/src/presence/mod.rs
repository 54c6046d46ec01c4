//! Presence tracking: who is currently connected.

pub mod heartbeat;
pub mod tracker;
