//! Provider rate limiter using governor and a Tokio semaphore.
//!
//! - Governor (GCRA) enforces requests per minute
//! - A semaphore bounds requests in flight

use crate::{ProviderLimits, RetryFailure, RetryPolicy};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use storyreel_error::RetryableError;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter shared by every completion call against one provider.
///
/// # Example
///
/// ```rust,ignore
/// let limiter = RateLimiter::new(ProviderLimits { rpm: Some(10), max_concurrent: Some(2) });
/// let text = limiter
///     .execute(&RetryPolicy::default(), || provider.complete(&request))
///     .await?;
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    limits: ProviderLimits,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
}

impl fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RateLimiter")
            .field("limits", &self.limits)
            .field("available_slots", &self.concurrent_semaphore.available_permits())
            .finish()
    }
}

impl RateLimiter {
    /// Create a limiter enforcing every non-`None` limit.
    pub fn new(limits: ProviderLimits) -> Self {
        let rpm_limiter = limits.rpm.and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        let max_concurrent = limits
            .max_concurrent
            .map(|n| n.max(1) as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);
        let concurrent_semaphore = Arc::new(Semaphore::new(max_concurrent));

        Self {
            limits,
            rpm_limiter,
            concurrent_semaphore,
        }
    }

    /// A limiter that never waits.
    pub fn unlimited() -> Self {
        Self::new(ProviderLimits::default())
    }

    /// Configured limits.
    pub fn limits(&self) -> &ProviderLimits {
        &self.limits
    }

    /// Wait until a request is allowed.
    ///
    /// Returns a guard that releases the concurrent slot when dropped.
    pub async fn acquire(&self) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // Acquire the slot last to avoid holding it while waiting on quota.
        // The semaphore is never closed, so acquisition only fails if it was.
        let permit = self.concurrent_semaphore.clone().acquire_owned().await.ok();

        RateLimiterGuard { _permit: permit }
    }

    /// Try to acquire without waiting.
    ///
    /// Returns `None` if any limit would block.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }
        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;
        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }

    /// Execute an operation with rate limiting and retry.
    ///
    /// A slot is acquired before every attempt and released after it, so
    /// backoff sleeps never hold a concurrency slot.
    ///
    /// # Errors
    ///
    /// Returns the policy's failure once retries are exhausted or a
    /// permanent error occurs.
    pub async fn execute<F, Fut, T, E>(
        &self,
        policy: &RetryPolicy,
        operation: F,
    ) -> Result<T, RetryFailure<E>>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: RetryableError + fmt::Display,
    {
        policy
            .execute(|| async {
                let _guard = self.acquire().await;
                operation().await
            })
            .await
    }
}

/// RAII guard for the rate limiter.
///
/// Releases the concurrent request slot when dropped, even if the request
/// fails or panics.
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
