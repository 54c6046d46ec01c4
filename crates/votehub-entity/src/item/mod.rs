//! Votable item identifiers.

pub mod key;

pub use key::{CONTRIBUTED_PREFIX, ItemKey, ItemName};
