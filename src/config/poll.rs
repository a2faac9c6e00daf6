//! Polling policy for observing the effect of a cache clear.
//!
//! Deleting cache entries is fire-and-forget on the host side: a successful
//! delete call does not mean the reported size has already dropped. The
//! clear cycle therefore waits a short settle delay, then re-polls the size
//! while the policy allows it.
//!
//! # Configuration Example
//!
//! ```toml
//! [poll]
//! settle_delay_ms = 500
//! retry_delay_ms = 1000
//! max_retries = 30
//! strategy = "constant"
//! timeout_seconds = 60
//! ```
//!
//! # Delay Strategies
//!
//! - **Constant**: Same delay between each re-poll
//! - **Linear**: Delay increases linearly (base * attempt)
//! - **Exponential**: Delay doubles each attempt (base * 2^(attempt-1))

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounded re-poll behavior of a clear cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollPolicy {
    /// Wait before the first size check after deletion (default: 500)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Base delay between re-polls in milliseconds (default: 1000)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Maximum number of re-polls after the first check (default: 30)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay strategy (default: constant)
    #[serde(default)]
    pub strategy: PollStrategy,

    /// Maximum total time to spend re-polling in seconds (default: 60)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retries: default_max_retries(),
            strategy: PollStrategy::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl PollPolicy {
    /// A policy that checks once after the settle delay and never re-polls.
    pub fn single_check() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Delay before re-poll number `attempt` (1-indexed), capped at the timeout.
    pub fn delay_for_retry(&self, attempt: u32) -> Duration {
        let base = self.retry_delay_ms;
        let attempt = u64::from(attempt.max(1));

        let delay_ms = match self.strategy {
            PollStrategy::Constant => base,
            PollStrategy::Linear => base.saturating_mul(attempt),
            PollStrategy::Exponential => {
                let shift = u32::try_from(attempt - 1).unwrap_or(u32::MAX).min(32);
                base.saturating_mul(1u64 << shift)
            }
        };

        Duration::from_millis(delay_ms).min(self.timeout())
    }

    /// Whether another re-poll is allowed after `attempt` re-polls and
    /// `elapsed` time spent re-polling.
    pub fn should_retry(&self, attempt: u32, elapsed: Duration) -> bool {
        attempt < self.max_retries && elapsed < self.timeout()
    }
}

/// Re-poll delay strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PollStrategy {
    /// Same delay between each re-poll.
    #[default]
    Constant,
    /// Delay increases linearly: base * attempt.
    Linear,
    /// Delay doubles each attempt: base * 2^(attempt-1).
    Exponential,
}

// Default value functions for serde
fn default_settle_delay_ms() -> u64 {
    500
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_max_retries() -> u32 {
    30
}

fn default_timeout_seconds() -> u64 {
    60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_policy_default() {
        let policy = PollPolicy::default();
        assert_eq!(policy.settle_delay(), Duration::from_millis(500));
        assert_eq!(policy.retry_delay_ms, 1000);
        assert_eq!(policy.max_retries, 30);
        assert_eq!(policy.strategy, PollStrategy::Constant);
        assert_eq!(policy.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_single_check_never_retries() {
        let policy = PollPolicy::single_check();
        assert!(!policy.should_retry(0, Duration::ZERO));
    }

    #[test]
    fn test_constant_strategy_delay() {
        let policy = PollPolicy::default();
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_retry(7), Duration::from_millis(1000));
    }

    #[test]
    fn test_linear_strategy_delay() {
        let policy = PollPolicy {
            strategy: PollStrategy::Linear,
            retry_delay_ms: 250,
            ..Default::default()
        };
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(250));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(500));
        assert_eq!(policy.delay_for_retry(4), Duration::from_millis(1000));
    }

    #[test]
    fn test_exponential_strategy_delay() {
        let policy = PollPolicy {
            strategy: PollStrategy::Exponential,
            retry_delay_ms: 100,
            ..Default::default()
        };
        assert_eq!(policy.delay_for_retry(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for_retry(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for_retry(3), Duration::from_millis(400));
    }

    #[test]
    fn test_delay_capped_at_timeout() {
        let policy = PollPolicy {
            strategy: PollStrategy::Exponential,
            retry_delay_ms: 10_000,
            timeout_seconds: 5,
            ..Default::default()
        };
        assert_eq!(policy.delay_for_retry(40), Duration::from_secs(5));
    }

    #[test]
    fn test_should_retry_bounds() {
        let policy = PollPolicy {
            max_retries: 3,
            timeout_seconds: 30,
            ..Default::default()
        };

        assert!(policy.should_retry(0, Duration::ZERO));
        assert!(policy.should_retry(2, Duration::from_secs(10)));
        assert!(!policy.should_retry(3, Duration::from_secs(10)));
        assert!(!policy.should_retry(1, Duration::from_secs(30)));
    }

    #[test]
    fn test_serde_defaults() {
        let policy: PollPolicy = toml::from_str("").unwrap();
        assert_eq!(policy, PollPolicy::default());
    }

    #[test]
    fn test_strategy_serde() {
        let policy: PollPolicy = toml::from_str(r#"strategy = "linear""#).unwrap();
        assert_eq!(policy.strategy, PollStrategy::Linear);

        let policy: PollPolicy = toml::from_str(r#"strategy = "exponential""#).unwrap();
        assert_eq!(policy.strategy, PollStrategy::Exponential);
    }
}
