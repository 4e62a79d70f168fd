//! Retry policy and rate limiting for completion calls.
//!
//! - [`RetryPolicy`] retries transient failures on an exponential schedule and
//!   stops immediately on permanent ones.
//! - [`RateLimiter`] enforces a provider's requests-per-minute quota and
//!   concurrent-request ceiling around each attempt.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod retry;

pub use config::{ProviderLimits, RetryConfig};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use retry::{RetryFailure, RetryPolicy};
