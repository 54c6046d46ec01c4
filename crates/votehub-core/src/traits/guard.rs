//! Input sanitization and rate limiting contract.

use std::fmt;

use crate::result::AppResult;

/// The user actions subject to rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GuardedAction {
    /// Toggling a vote.
    Vote,
    /// Submitting a new idea.
    Submission,
    /// Publishing to the activity feed.
    Notification,
}

impl GuardedAction {
    /// Return the action as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vote => "vote",
            Self::Submission => "submission",
            Self::Notification => "notification",
        }
    }
}

impl fmt::Display for GuardedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Validates raw user input and enforces per-user action quotas.
///
/// Every method runs before any store interaction; an error means the
/// action was rejected with no state change.
pub trait InputGuard: Send + Sync + fmt::Debug + 'static {
    /// Sanitize and validate a voter display name.
    fn voter_name(&self, raw: &str) -> AppResult<String>;

    /// Sanitize and validate a submitted idea name.
    fn submission_name(&self, raw: &str) -> AppResult<String>;

    /// Sanitize and validate an activity message.
    fn message(&self, raw: &str) -> AppResult<String>;

    /// Record one `action` by `user_id`, failing with `RateLimit` when the
    /// quota for that action is exhausted.
    fn admit(&self, action: GuardedAction, user_id: &str) -> AppResult<()>;
}
