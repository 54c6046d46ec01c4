//! # votehub-store
//!
//! Implementations of the shared realtime store contract
//! ([`votehub_core::traits::SyncStore`]):
//!
//! - [`memory::MemoryStore`]: a process-local tree with live subscriptions,
//!   used for single-process sessions, demos, and tests
//! - [`firebase::FirebaseStore`]: the Firebase Realtime Database REST API,
//!   with server-sent-event streaming for subscriptions
//!
//! [`provider::StoreManager`] selects one from configuration.

#[cfg(feature = "firebase")]
pub mod firebase;
#[cfg(feature = "memory")]
pub mod memory;
pub mod paths;
pub mod provider;
pub mod push_id;
pub mod tree;

pub use provider::StoreManager;
