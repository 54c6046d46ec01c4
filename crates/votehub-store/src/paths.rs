//! Path builders for every location VoteHub reads or writes.
//!
//! Centralising path construction keeps the four namespaces consistent
//! between writers and subscribers.

use votehub_core::types::path::{StorePath, StoreRoot};

// ── Votes ──────────────────────────────────────────────────

/// Root of the vote ledger.
pub fn votes() -> StorePath {
    StorePath::root(StoreRoot::Votes)
}

/// One voter's ballot.
pub fn ballot(voter: &str) -> StorePath {
    votes().child(voter)
}

/// One selection in one voter's ballot.
pub fn vote(voter: &str, item_key: &str) -> StorePath {
    ballot(voter).child(item_key)
}

// ── Submissions ────────────────────────────────────────────

/// Root of all submissions.
pub fn submissions() -> StorePath {
    StorePath::root(StoreRoot::UserSubmissions)
}

/// Ordered submissions of one category.
pub fn category_submissions(category_id: &str) -> StorePath {
    submissions().child(category_id)
}

/// One stored submission.
pub fn submission(category_id: &str, id: &str) -> StorePath {
    category_submissions(category_id).child(id)
}

// ── Presence ───────────────────────────────────────────────

/// Root of presence entries.
pub fn active_users() -> StorePath {
    StorePath::root(StoreRoot::ActiveUsers)
}

/// Presence entry of one voter, keyed by the sanitized identity.
pub fn presence(voter: &str) -> StorePath {
    active_users().child(voter)
}

// ── Notifications ──────────────────────────────────────────

/// Root of the activity feed.
pub fn notifications() -> StorePath {
    StorePath::root(StoreRoot::Notifications)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vote_path() {
        assert_eq!(
            vote("Ana", "hispanic-ConversaFlow").as_str(),
            "votes/Ana/hispanic-ConversaFlow"
        );
    }

    #[test]
    fn test_presence_path_is_sanitized() {
        assert_eq!(presence("ana.m").as_str(), "activeUsers/ana_m");
    }

    #[test]
    fn test_submission_path() {
        assert_eq!(
            submission("speed", "-NxA1").as_str(),
            "userSubmissions/speed/-NxA1"
        );
    }
}
