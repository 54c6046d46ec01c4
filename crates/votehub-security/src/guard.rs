//! Default input guard.

use tracing::warn;

use votehub_core::config::AppConfig;
use votehub_core::error::AppError;
use votehub_core::result::AppResult;
use votehub_core::traits::guard::{GuardedAction, InputGuard};

use crate::rate_limit::RateLimiters;
use crate::validation::InputValidator;

/// Validation rules plus per-action rate limits.
#[derive(Debug)]
pub struct DefaultGuard {
    validator: InputValidator,
    limiters: RateLimiters,
}

impl DefaultGuard {
    /// Creates a guard from application configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            validator: InputValidator::new(&config.validation),
            limiters: RateLimiters::new(&config.rate_limit),
        }
    }

    /// The underlying limiters.
    pub fn limiters(&self) -> &RateLimiters {
        &self.limiters
    }
}

impl Default for DefaultGuard {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl InputGuard for DefaultGuard {
    fn voter_name(&self, raw: &str) -> AppResult<String> {
        self.validator.voter_name(raw)
    }

    fn submission_name(&self, raw: &str) -> AppResult<String> {
        self.validator.submission_name(raw)
    }

    fn message(&self, raw: &str) -> AppResult<String> {
        self.validator.message(raw)
    }

    fn admit(&self, action: GuardedAction, user_id: &str) -> AppResult<()> {
        if self.limiters.for_action(action).check(user_id) {
            return Ok(());
        }
        warn!(action = %action, user_id, "Action rejected by rate limiter");
        Err(AppError::rate_limit(format!(
            "Too many {action} actions, please wait a moment"
        )))
    }
}
