//! Text-completion provider errors and retry classification.

use std::time::Duration;

/// Failure categories reported by a text-completion provider.
///
/// Only these categories cross the provider boundary; each provider maps its
/// own transport and status codes onto them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CompletionErrorKind {
    /// Request rate exceeded; the provider may suggest a wait
    #[display("Rate limited: {}", message)]
    RateLimited {
        /// Provider message
        message: String,
        /// Suggested wait in milliseconds (from `Retry-After`)
        retry_after_ms: Option<u64>,
    },
    /// Missing, invalid or revoked credentials
    #[display("Unauthenticated: {}", _0)]
    Unauthenticated(String),
    /// Account quota or billing limit exhausted
    #[display("Quota exceeded: {}", _0)]
    QuotaExceeded(String),
    /// The request did not complete in time
    #[display("Timed out: {}", _0)]
    Timeout(String),
    /// Anything else (5xx, malformed response, network failure)
    #[display("Provider error: {}", _0)]
    Unknown(String),
}

impl CompletionErrorKind {
    /// Check if this error type should be retried.
    ///
    /// Authentication and quota failures will not heal by waiting.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            CompletionErrorKind::Unauthenticated(_) | CompletionErrorKind::QuotaExceeded(_)
        )
    }

    /// Short category label used in logs and scene failure reports.
    pub fn category(&self) -> &'static str {
        match self {
            CompletionErrorKind::RateLimited { .. } => "rate_limited",
            CompletionErrorKind::Unauthenticated(_) => "unauthenticated",
            CompletionErrorKind::QuotaExceeded(_) => "quota_exceeded",
            CompletionErrorKind::Timeout(_) => "timeout",
            CompletionErrorKind::Unknown(_) => "unknown",
        }
    }
}

/// Completion error with source location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{CompletionError, CompletionErrorKind, RetryableError};
///
/// let err = CompletionError::new(CompletionErrorKind::Timeout("30s elapsed".into()));
/// assert!(err.is_retryable());
///
/// let err = CompletionError::new(CompletionErrorKind::Unauthenticated("bad key".into()));
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Completion Error: {} at line {} in {}", kind, line, file)]
pub struct CompletionError {
    /// The kind of error that occurred
    pub kind: CompletionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl CompletionError {
    /// Create a new CompletionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: CompletionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Trait for errors that support retry logic.
///
/// Lets the retry policy decide between a transient failure (wait and try
/// again) and a permanent one (stop immediately).
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Provider-suggested delay before the next attempt, if any.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for CompletionError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        match &self.kind {
            CompletionErrorKind::RateLimited {
                retry_after_ms: Some(ms),
                ..
            } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}
