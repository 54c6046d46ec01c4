//! Convenience result type alias for VoteHub.

use crate::error::AppError;

/// A specialized `Result` type for VoteHub operations.
pub type AppResult<T> = Result<T, AppError>;
