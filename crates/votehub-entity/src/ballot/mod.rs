//! Per-voter selections and the whole vote ledger.

pub mod model;

pub use model::{Ballot, LedgerSnapshot};
