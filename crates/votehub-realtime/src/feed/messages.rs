//! Builders for activity feed messages.

use votehub_entity::ItemKey;

/// A voter opened a session.
pub fn joined(voter: &str) -> String {
    format!("{voter} joined the vote")
}

/// A voter cast a vote for an item.
pub fn voted(voter: &str, item_key: &ItemKey) -> String {
    format!("{voter} voted for \"{}\"", item_key.display_name())
}

/// Someone submitted a new item.
pub fn submitted(submitter: &str, name: &str) -> String {
    format!("{submitter} added \"{name}\"")
}
