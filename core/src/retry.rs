//! Retry budget and backoff schedule.

use std::time::Duration;

/// Retries after the first attempt. Three network attempts in total.
pub const MAX_RETRIES: u32 = 2;

/// Delay before the first retry; doubles for each one after it.
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// How many times a failed attempt is retried, and how long to wait first.
///
/// Pure exponential backoff: no jitter, no cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// A policy that gives up after the first attempt.
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Delay after the 0-indexed `attempt` failed.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let multiplier = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(multiplier)
    }

    /// Whether another attempt may follow the 0-indexed `attempt`.
    pub fn has_budget(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_RETRIES, RETRY_BASE_DELAY)
    }
}
