//! Sliding-window rate limiter keyed by user id.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

use votehub_core::config::{RateLimitConfig, RateLimitPolicy};
use votehub_core::traits::guard::GuardedAction;
use votehub_core::types::time::{EpochMillis, now_millis};

/// Idle keys are swept once every this many checks.
const PURGE_EVERY: u64 = 256;

/// In-memory sliding-window limiter.
///
/// An action is accepted when fewer than `max_actions` accepted actions by
/// the same key happened in the last `window_ms` milliseconds. Rejected
/// attempts are not recorded. Keys idle for a whole window are dropped
/// periodically as checks come in.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
    /// Key → timestamps of accepted actions, oldest first.
    actions: DashMap<String, VecDeque<EpochMillis>>,
    /// Quota applied to every key.
    policy: RateLimitPolicy,
    /// Checks since creation, drives the periodic purge.
    checks: AtomicU64,
}

impl SlidingWindowLimiter {
    /// Creates a new limiter.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            actions: DashMap::new(),
            policy,
            checks: AtomicU64::new(0),
        }
    }

    /// The configured quota.
    pub fn policy(&self) -> RateLimitPolicy {
        self.policy
    }

    /// Attempts to record an action for `key` now.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, now_millis())
    }

    /// Attempts to record an action for `key` at time `now`.
    pub fn check_at(&self, key: &str, now: EpochMillis) -> bool {
        if self.checks.fetch_add(1, Ordering::Relaxed) % PURGE_EVERY == PURGE_EVERY - 1 {
            self.purge_at(now);
        }

        let mut recent = self.actions.entry(key.to_string()).or_default();

        while recent
            .front()
            .is_some_and(|at| now - *at >= self.policy.window_ms)
        {
            recent.pop_front();
        }

        if recent.len() >= self.policy.max_actions {
            debug!(key, limit = self.policy.max_actions, "Rate limit reached");
            return false;
        }

        recent.push_back(now);
        true
    }

    /// Forget every key with no action inside the window.
    pub fn purge_at(&self, now: EpochMillis) {
        let window = self.policy.window_ms;
        let before = self.actions.len();
        self.actions
            .retain(|_, recent| recent.back().is_some_and(|at| now - *at < window));
        debug!(purged = before - self.actions.len(), "Idle rate limit keys purged");
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.actions.len()
    }
}

/// One limiter per guarded action.
#[derive(Debug)]
pub struct RateLimiters {
    vote: SlidingWindowLimiter,
    submission: SlidingWindowLimiter,
    notification: SlidingWindowLimiter,
}

impl RateLimiters {
    /// Creates limiters from rate limit configuration.
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            vote: SlidingWindowLimiter::new(config.vote),
            submission: SlidingWindowLimiter::new(config.submission),
            notification: SlidingWindowLimiter::new(config.notification),
        }
    }

    /// The limiter for `action`.
    pub fn for_action(&self, action: GuardedAction) -> &SlidingWindowLimiter {
        match action {
            GuardedAction::Vote => &self.vote,
            GuardedAction::Submission => &self.submission,
            GuardedAction::Notification => &self.notification,
        }
    }
}

impl Default for RateLimiters {
    fn default() -> Self {
        Self::new(&RateLimitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_quota() {
        let limiter = SlidingWindowLimiter::new(RateLimitPolicy::new(3, 1_000));
        assert!(limiter.check_at("ana", 0));
        assert!(limiter.check_at("ana", 10));
        assert!(limiter.check_at("ana", 20));
        assert!(!limiter.check_at("ana", 30));
        assert!(limiter.check_at("luis", 30));
    }

    #[test]
    fn test_window_slides() {
        let limiter = SlidingWindowLimiter::new(RateLimitPolicy::new(2, 1_000));
        assert!(limiter.check_at("ana", 0));
        assert!(limiter.check_at("ana", 500));
        assert!(!limiter.check_at("ana", 999));
        assert!(limiter.check_at("ana", 1_000));
        assert!(!limiter.check_at("ana", 1_200));
        assert!(limiter.check_at("ana", 1_500));
    }

    #[test]
    fn test_rejections_are_not_recorded() {
        let limiter = SlidingWindowLimiter::new(RateLimitPolicy::new(1, 100));
        assert!(limiter.check_at("ana", 0));
        for t in 1..100 {
            assert!(!limiter.check_at("ana", t));
        }
        assert!(limiter.check_at("ana", 100));
    }

    #[test]
    fn test_purge_drops_idle_keys() {
        let limiter = SlidingWindowLimiter::new(RateLimitPolicy::new(1, 100));
        limiter.check_at("ana", 0);
        limiter.check_at("luis", 50);
        limiter.purge_at(120);
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_checks_sweep_idle_keys() {
        let limiter = SlidingWindowLimiter::new(RateLimitPolicy::new(1, 100));
        for i in 0..PURGE_EVERY - 1 {
            assert!(limiter.check_at(&format!("voter-{i}"), 0));
        }
        assert_eq!(limiter.tracked_keys(), (PURGE_EVERY - 1) as usize);

        assert!(limiter.check_at("late", 200));
        assert_eq!(limiter.tracked_keys(), 1);
    }

    #[test]
    fn test_default_policies() {
        let limiters = RateLimiters::default();
        assert_eq!(limiters.for_action(GuardedAction::Vote).policy().max_actions, 20);
        assert_eq!(
            limiters.for_action(GuardedAction::Submission).policy().window_ms,
            300_000
        );
        assert_eq!(
            limiters.for_action(GuardedAction::Notification).policy().max_actions,
            50
        );
    }
}
