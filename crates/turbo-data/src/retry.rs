//! Retry policies for commerce API calls.

use std::time::Duration;

use crate::error::FetchError;

/// Delay between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffStrategy {
    None,
    Fixed(Duration),
    /// Doubles from `base` on every attempt, never above `max`.
    Exponential { base: Duration, max: Duration },
}

impl BackoffStrategy {
    /// Delay before retrying after failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match *self {
            Self::None => Duration::ZERO,
            Self::Fixed(delay) => delay,
            Self::Exponential { base, max } => base
                .checked_mul(2u32.saturating_pow(attempt))
                .map_or(max, |delay| delay.min(max)),
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(1000),
        }
    }
}

/// How often a call is retried after a transient failure.
///
/// Only errors that can succeed on a second try are retried: timeouts,
/// connection failures and 5xx responses. GraphQL errors and bad responses
/// fail immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        if max_retries == 0 {
            return Self::none();
        }
        Self {
            max_retries,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::None,
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffStrategy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Check if failed attempt `attempt` (0-indexed) should be retried.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> FetchError {
        FetchError::Http {
            status,
            url: "http://shop/api".into(),
        }
    }

    #[test]
    fn test_exponential_backoff_capped() {
        let backoff = BackoffStrategy::Exponential {
            base: Duration::from_millis(100),
            max: Duration::from_millis(350),
        };
        assert_eq!(backoff.delay_for_attempt(0), Duration::from_millis(100));
        assert_eq!(backoff.delay_for_attempt(1), Duration::from_millis(200));
        assert_eq!(backoff.delay_for_attempt(2), Duration::from_millis(350));
        assert_eq!(backoff.delay_for_attempt(40), Duration::from_millis(350));
    }

    #[test]
    fn test_retries_transient_errors_only() {
        let policy = RetryPolicy::new(2);

        assert!(policy.should_retry(&FetchError::Timeout("search".into()), 0));
        assert!(policy.should_retry(&FetchError::Connection("refused".into()), 1));
        assert!(policy.should_retry(&http(503), 0));
        assert!(!policy.should_retry(&http(400), 0));
        assert!(!policy.should_retry(&FetchError::Graphql("bad input".into()), 0));
    }

    #[test]
    fn test_attempt_limit() {
        let policy = RetryPolicy::new(1);
        assert!(!policy.should_retry(&FetchError::Timeout("search".into()), 1));
        assert!(!RetryPolicy::none().should_retry(&FetchError::Timeout("search".into()), 0));
    }

    #[test]
    fn test_zero_retries_has_no_backoff() {
        assert_eq!(RetryPolicy::new(0), RetryPolicy::none());
        let fixed = RetryPolicy::new(3).with_backoff(BackoffStrategy::Fixed(Duration::from_millis(50)));
        assert_eq!(fixed.backoff.delay_for_attempt(2), Duration::from_millis(50));
    }
}
