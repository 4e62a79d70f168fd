//! Configuration structures for retry and rate limiting.

use serde::{Deserialize, Serialize};
use storyreel_error::ConfigError;

/// Retry parameters for completion calls.
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 4
/// initial_backoff_ms = 1000
/// factor = 2.0
/// max_delay_ms = 30000
/// jitter = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts including the first call
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Multiplier applied to the delay after each failed attempt
    #[serde(default = "default_factor")]
    pub factor: f64,

    /// Upper bound on any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Randomise delays to avoid synchronised retries
    #[serde(default = "default_jitter")]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    4
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_factor() -> f64 {
    2.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}

fn default_jitter() -> bool {
    true
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            factor: default_factor(),
            max_delay_ms: default_max_delay_ms(),
            jitter: default_jitter(),
        }
    }
}

impl RetryConfig {
    /// Validates the retry parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if there are zero attempts or the factor is below 1.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1"));
        }
        if !self.factor.is_finite() || self.factor < 1.0 {
            return Err(ConfigError::new(format!(
                "retry.factor must be a finite number >= 1.0, got {}",
                self.factor
            )));
        }
        if self.max_delay_ms < self.initial_backoff_ms {
            return Err(ConfigError::new(format!(
                "retry.max_delay_ms ({}) must not be below retry.initial_backoff_ms ({})",
                self.max_delay_ms, self.initial_backoff_ms
            )));
        }
        Ok(())
    }
}

/// Request quotas for one provider. `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ProviderLimits {
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Maximum requests in flight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrent: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(RetryConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_attempts_rejected() {
        let config = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn shrinking_factor_rejected() {
        let config = RetryConfig {
            factor: 0.5,
            ..RetryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
