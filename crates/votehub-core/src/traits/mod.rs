//! Collaborator traits defined in `votehub-core` and implemented by other crates.

pub mod guard;
pub mod store;

pub use guard::{GuardedAction, InputGuard};
pub use store::{Subscription, SyncStore};
