use std::time::Duration;

use tuvung_config::retry::RetryConfig;
use tuvung_translator::ProviderError;
use tuvung_types::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryDecision {
    pub retry: bool,
    /// Wait before the next attempt, zero when not retrying
    pub delay: Duration,
}

impl RetryDecision {
    fn stop() -> Self {
        Self {
            retry: false,
            delay: Duration::ZERO,
        }
    }
}

/// Bounded exponential backoff for the primary provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// `max_attempts` counts every call, the first one included; at least one call is always made
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
            Duration::from_millis(config.max_delay_ms),
        )
    }

    /// Single attempt, never retry
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Decide after the `attempt`-th call (1-based) failed with `error`
    pub fn should_retry(&self, attempt: u32, error: &ProviderError) -> RetryDecision {
        let retryable = match error.kind() {
            ErrorKind::NetworkFailure => true,
            ErrorKind::ProviderRejected => error.is_transient(),
            ErrorKind::InvalidQuery
            | ErrorKind::MissingCredential
            | ErrorKind::Unauthenticated
            | ErrorKind::MalformedResponse => false,
        };

        if !retryable || attempt >= self.max_attempts {
            return RetryDecision::stop();
        }

        RetryDecision {
            retry: true,
            delay: self.backoff(attempt),
        }
    }

    /// `base_delay * 2^(attempt - 1)`, capped at `max_delay`
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .saturating_mul(1u32 << exponent)
            .min(self.max_delay)
    }
}
