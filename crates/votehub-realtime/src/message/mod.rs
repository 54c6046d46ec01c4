//! Events a session emits to whatever renders it.

pub mod types;
