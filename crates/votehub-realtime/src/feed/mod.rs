//! Activity feed.

pub mod activity;
pub mod messages;
