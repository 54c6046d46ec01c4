//! Pure aggregation over ledger, catalog and submission snapshots.

pub mod aggregator;
pub mod badge;

pub use aggregator::{Aggregator, Popularity, RankedItem, Standings};
pub use badge::{Badge, popularity_badge};
