//! Timeout configuration for commerce API calls.

use std::time::Duration;

/// Timeout configuration for a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Connection timeout.
    pub connect: Duration,
    /// Total time for one attempt, response body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self {
            connect: Duration::from_millis(total.as_millis() as u64 / 4),
            total,
        }
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_total(Duration::from_millis(5000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_total() {
        let t = TimeoutConfig::from_total(Duration::from_millis(2000));
        assert_eq!(t.connect, Duration::from_millis(500));
        assert_eq!(t.total, Duration::from_millis(2000));
    }
}
