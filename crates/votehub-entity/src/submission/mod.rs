//! User-contributed candidate items.

pub mod model;

pub use model::{Submission, SubmissionEntry, SubmissionSnapshot};
