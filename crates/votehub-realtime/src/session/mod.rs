//! Voting session: the object that owns a client's live state.

pub mod sync;
pub mod voting;
