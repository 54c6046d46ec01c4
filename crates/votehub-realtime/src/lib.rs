//! # votehub-realtime
//!
//! The voting core. Provides:
//!
//! - Vote ledger with optimistic toggles and rollback on failed writes
//! - Pure aggregation over ledger, catalog and submission snapshots
//! - Presence tracking with a cancellable heartbeat task
//! - Activity feed with session-relative recency and celebration hooks
//! - Submission store for user-contributed items
//! - [`VotingSession`], which owns the subscriptions and the heartbeat

pub mod aggregate;
pub mod feed;
pub mod ledger;
pub mod message;
pub mod presence;
pub mod session;
pub mod submission;

pub use aggregate::aggregator::Aggregator;
pub use aggregate::badge::Badge;
pub use feed::activity::ActivityFeed;
pub use ledger::vote_ledger::{ToggleOutcome, VoteLedger};
pub use message::types::SessionUpdate;
pub use presence::heartbeat::HeartbeatTask;
pub use presence::tracker::PresenceTracker;
pub use session::voting::VotingSession;
pub use submission::store::SubmissionStore;
