//! Bounded exponential retry for completion calls.

use crate::RetryConfig;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use storyreel_error::RetryableError;
use tokio_retry2::{Retry, RetryError, strategy::jitter};
use tracing::{debug, warn};

/// Why a retried operation ultimately failed.
#[derive(Debug, Clone)]
pub struct RetryFailure<E> {
    /// Last error returned by the operation
    pub error: E,
    /// Attempts made, including the first
    pub attempts: u32,
}

impl<E> RetryFailure<E> {
    /// True if the operation stopped on an error that was never worth retrying.
    pub fn is_permanent(&self) -> bool
    where
        E: RetryableError,
    {
        !self.error.is_retryable()
    }
}

impl<E: fmt::Display> fmt::Display for RetryFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (after {} attempt(s))", self.error, self.attempts)
    }
}

/// Retry policy: attempt cap, backoff schedule and a retryable-error predicate.
///
/// The predicate comes from [`RetryableError`] on the operation's error type.
/// Transient errors wait for the next delay in the schedule, or for the
/// provider's `retry_after` hint when that is longer, never beyond
/// `max_delay_ms`. Permanent errors stop immediately.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyreel_rate_limit::{RetryConfig, RetryPolicy};
///
/// let policy = RetryPolicy::new(RetryConfig {
///     max_attempts: 4,
///     initial_backoff_ms: 500,
///     factor: 2.0,
///     max_delay_ms: 1500,
///     jitter: false,
/// });
/// assert_eq!(
///     policy.schedule(),
///     vec![
///         Duration::from_millis(500),
///         Duration::from_millis(1000),
///         Duration::from_millis(1500),
///     ]
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy from configuration.
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// A policy that makes exactly one attempt.
    pub fn no_retry() -> Self {
        Self::new(RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        })
    }

    /// The underlying configuration.
    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Maximum number of attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.config.max_attempts.max(1)
    }

    /// Delays between attempts, before jitter.
    ///
    /// Has `max_attempts - 1` entries; each is `initial * factor^k`, capped at
    /// `max_delay_ms`.
    pub fn schedule(&self) -> Vec<Duration> {
        let cap = self.config.max_delay_ms as f64;
        let mut delay = self.config.initial_backoff_ms as f64;
        let mut delays = Vec::new();
        for _ in 1..self.max_attempts() {
            delays.push(Duration::from_millis(delay.min(cap).round() as u64));
            delay *= self.config.factor;
        }
        delays
    }

    /// Run `operation` until it succeeds, fails permanently or the attempts run out.
    ///
    /// # Errors
    ///
    /// Returns the last error together with the number of attempts made.
    pub async fn execute<F, Fut, T, E>(&self, operation: F) -> Result<T, RetryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + fmt::Display,
    {
        let attempts = AtomicU32::new(0);
        let schedule: Vec<Duration> = if self.config.jitter {
            self.schedule().into_iter().map(jitter).collect()
        } else {
            self.schedule()
        };

        let cap = Duration::from_millis(self.config.max_delay_ms);

        let result = Retry::spawn(schedule.clone(), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
            let scheduled = schedule.get(attempt as usize - 1).copied();
            let call = operation();
            async move {
                match call.await {
                    Ok(value) => {
                        debug!(attempt, "Attempt succeeded");
                        Ok(value)
                    }
                    Err(e) if e.is_retryable() => {
                        warn!(attempt, error = %e, "Transient error, will retry");
                        // The strategy sleeps its own delay next; top it up to the hint.
                        if let (Some(scheduled), Some(hint)) = (scheduled, e.retry_after()) {
                            let extra = hint.min(cap).saturating_sub(scheduled);
                            if !extra.is_zero() {
                                debug!(attempt, ?hint, ?extra, "Honouring retry-after hint");
                                tokio::time::sleep(extra).await;
                            }
                        }
                        Err(RetryError::Transient {
                            retry_after: e.retry_after(),
                            err: e,
                        })
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Permanent error, failing immediately");
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        result.map_err(|error| RetryFailure {
            error,
            attempts: attempts.load(Ordering::SeqCst),
        })
    }
}
