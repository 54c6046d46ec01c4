//! Hosted Firebase Realtime Database backend.

pub mod sse;
pub mod store;

pub use store::FirebaseStore;
