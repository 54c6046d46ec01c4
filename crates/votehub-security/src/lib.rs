//! Input guard for VoteHub.
//!
//! Provides the sanitization and validation rules applied to every piece of
//! user-supplied text, the sliding-window rate limiter, and
//! [`DefaultGuard`], the [`InputGuard`](votehub_core::traits::InputGuard)
//! implementation the voting session calls before touching the store.

pub mod guard;
pub mod rate_limit;
pub mod validation;

pub use guard::DefaultGuard;
pub use rate_limit::{RateLimiters, SlidingWindowLimiter};
pub use validation::{InputValidator, sanitize};
