//! # votehub-entity
//!
//! Typed value objects for every path of the shared store. Payloads read
//! from the store are parsed and validated at this boundary; malformed
//! entries are rejected rather than trusted.

pub mod ballot;
pub mod catalog;
pub mod item;
pub mod notification;
pub mod presence;
pub mod snapshot;
pub mod submission;

pub use ballot::{Ballot, LedgerSnapshot};
pub use catalog::{Catalog, Category};
pub use item::{ItemKey, ItemName};
pub use notification::{Notification, NotificationKind, NotificationLog};
pub use presence::{PresenceEntry, PresenceSnapshot};
pub use snapshot::Decoded;
pub use submission::{Submission, SubmissionEntry, SubmissionSnapshot};
