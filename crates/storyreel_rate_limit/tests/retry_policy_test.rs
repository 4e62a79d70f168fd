//! Retry schedule and rate limiter behaviour under a paused clock.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use storyreel_error::{CompletionError, CompletionErrorKind};
use storyreel_rate_limit::{ProviderLimits, RateLimiter, RetryConfig, RetryPolicy};
use tokio::time::Instant;

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::new(RetryConfig {
        max_attempts,
        initial_backoff_ms: 100,
        factor: 2.0,
        max_delay_ms: 250,
        jitter: false,
    })
}

/// Fails with the scripted errors in order, then succeeds.
fn scripted(
    failures: Vec<CompletionErrorKind>,
) -> (Arc<Mutex<usize>>, impl Fn() -> std::future::Ready<Result<&'static str, CompletionError>>) {
    let calls = Arc::new(Mutex::new(0usize));
    let counter = calls.clone();
    let op = move || {
        let mut count = counter.lock().unwrap();
        let index = *count;
        *count += 1;
        std::future::ready(match failures.get(index) {
            Some(kind) => Err(CompletionError::new(kind.clone())),
            None => Ok("done"),
        })
    };
    (calls, op)
}

#[test]
fn schedule_grows_and_caps() {
    assert_eq!(
        policy(5).schedule(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(250),
            Duration::from_millis(250),
        ]
    );
    assert!(policy(1).schedule().is_empty());
    assert_eq!(RetryPolicy::no_retry().max_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn transient_errors_retry_then_succeed() {
    let (calls, op) = scripted(vec![
        CompletionErrorKind::Timeout("slow".into()),
        CompletionErrorKind::Unknown("503".into()),
    ]);

    let start = Instant::now();
    let result = policy(4).execute(op).await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(*calls.lock().unwrap(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn permanent_error_stops_after_one_attempt() {
    let (calls, op) = scripted(vec![CompletionErrorKind::Unauthenticated("bad key".into())]);

    let failure = policy(4).execute(op).await.unwrap_err();

    assert_eq!(failure.attempts, 1);
    assert!(failure.is_permanent());
    assert_eq!(*calls.lock().unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn exhausted_attempts_report_last_error() {
    let (calls, op) = scripted(vec![
        CompletionErrorKind::Timeout("1".into()),
        CompletionErrorKind::Timeout("2".into()),
        CompletionErrorKind::Timeout("3".into()),
    ]);

    let failure = policy(3).execute(op).await.unwrap_err();

    assert_eq!(failure.attempts, 3);
    assert!(!failure.is_permanent());
    assert_eq!(failure.error.kind, CompletionErrorKind::Timeout("3".into()));
    assert_eq!(*calls.lock().unwrap(), 3);
}

#[tokio::test(start_paused = true)]
async fn retry_after_hint_overrides_schedule() {
    let (_calls, op) = scripted(vec![CompletionErrorKind::RateLimited {
        message: "slow down".into(),
        retry_after_ms: Some(200),
    }]);

    let start = Instant::now();
    let result = policy(2).execute(op).await;

    assert!(result.is_ok());
    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn retry_after_hint_is_capped_at_max_delay() {
    let (calls, op) = scripted(vec![CompletionErrorKind::RateLimited {
        message: "come back tomorrow".into(),
        retry_after_ms: Some(86_400_000),
    }]);

    let start = Instant::now();
    let result = policy(2).execute(op).await;

    assert!(result.is_ok());
    assert_eq!(start.elapsed(), Duration::from_millis(250));
    assert_eq!(*calls.lock().unwrap(), 2);
}

#[tokio::test(start_paused = true)]
async fn shorter_hint_keeps_scheduled_delay() {
    let (_calls, op) = scripted(vec![CompletionErrorKind::RateLimited {
        message: "slow down".into(),
        retry_after_ms: Some(10),
    }]);

    let start = Instant::now();
    let result = policy(2).execute(op).await;

    assert!(result.is_ok());
    assert_eq!(start.elapsed(), Duration::from_millis(100));
}

#[tokio::test]
async fn concurrency_slots_are_bounded() {
    let limiter = RateLimiter::new(ProviderLimits {
        rpm: None,
        max_concurrent: Some(2),
    });

    let first = limiter.try_acquire();
    let second = limiter.try_acquire();
    assert!(first.is_some());
    assert!(second.is_some());
    assert!(limiter.try_acquire().is_none());

    drop(first);
    assert!(limiter.try_acquire().is_some());
}

#[tokio::test]
async fn rpm_quota_blocks_try_acquire() {
    let limiter = RateLimiter::new(ProviderLimits {
        rpm: Some(1),
        max_concurrent: None,
    });

    assert!(limiter.try_acquire().is_some());
    assert!(limiter.try_acquire().is_none());
}

#[tokio::test(start_paused = true)]
async fn limiter_execute_applies_policy() {
    let limiter = RateLimiter::unlimited();
    let (calls, op) = scripted(vec![CompletionErrorKind::Timeout("slow".into())]);

    let result = limiter.execute(&policy(3), op).await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(*calls.lock().unwrap(), 2);
}
