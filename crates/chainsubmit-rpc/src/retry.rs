//! Capped exponential backoff for transient transport failures.

use std::time::Duration;

/// Configuration for the retry policy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the first try).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
    /// Growth factor between consecutive delays.
    pub multiplier: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(250),
            max_backoff: Duration::from_secs(10),
            multiplier: 2,
        }
    }
}

/// Stateless policy: the delay depends only on the attempt number.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub config: RetryConfig,
}

impl RetryPolicy {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Delay before the `attempt`-th retry (1-based):
    /// `min(initial_backoff * multiplier^(attempt - 1), max_backoff)`.
    /// `None` once `attempt` exceeds `max_retries`.
    pub fn next_delay(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.config.max_retries {
            return None;
        }
        let factor = self.config.multiplier.saturating_pow(attempt - 1);
        let delay = self
            .config
            .initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.config.max_backoff);
        Some(delay.min(self.config.max_backoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32, initial_ms: u64, max_ms: u64, multiplier: u32) -> RetryPolicy {
        RetryPolicy::new(RetryConfig {
            max_retries,
            initial_backoff: Duration::from_millis(initial_ms),
            max_backoff: Duration::from_millis(max_ms),
            multiplier,
        })
    }

    #[test]
    fn delays_double() {
        let policy = policy(3, 100, 30_000, 2);
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_delay(3), Some(Duration::from_millis(400)));
        assert!(policy.next_delay(4).is_none());
        assert!(policy.next_delay(0).is_none());
    }

    #[test]
    fn delay_capped_at_max() {
        let policy = policy(10, 100, 500, 10);
        assert_eq!(policy.next_delay(2), Some(Duration::from_millis(500)));
        assert_eq!(policy.next_delay(10), Some(Duration::from_millis(500)));
    }

    #[test]
    fn delays_are_deterministic() {
        let policy = RetryPolicy::new(RetryConfig::default());
        assert_eq!(policy.next_delay(2), policy.next_delay(2));
        assert_eq!(policy.next_delay(1), Some(Duration::from_millis(250)));
    }

    #[test]
    fn huge_multiplier_saturates_to_max() {
        let policy = policy(40, 1_000, 5_000, u32::MAX);
        assert_eq!(policy.next_delay(40), Some(Duration::from_millis(5_000)));
    }
}
