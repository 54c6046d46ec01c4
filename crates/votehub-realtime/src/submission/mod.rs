//! User-contributed items.

pub mod store;
