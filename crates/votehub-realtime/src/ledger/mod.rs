//! Vote ledger.

pub mod vote_ledger;
