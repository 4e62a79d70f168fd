//! Mapping of HTTP and transport failures onto completion error categories.

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use storyreel_error::CompletionErrorKind;

/// Words that distinguish an exhausted quota from a transient 429.
const QUOTA_MARKERS: &[&str] = &["quota", "billing", "insufficient_quota", "exceeded your current"];

/// Classify a non-success HTTP response.
///
/// - 401/403 → `Unauthenticated`
/// - 429 mentioning quota or billing → `QuotaExceeded`, otherwise `RateLimited`
///   with the `Retry-After` header (seconds) as a hint
/// - 408/504 → `Timeout`
/// - anything else → `Unknown`
pub fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> CompletionErrorKind {
    let message = format!("HTTP {}: {}", status.as_u16(), body.trim());
    match status.as_u16() {
        401 | 403 => CompletionErrorKind::Unauthenticated(message),
        429 => {
            let lower = body.to_lowercase();
            if QUOTA_MARKERS.iter().any(|marker| lower.contains(marker)) {
                CompletionErrorKind::QuotaExceeded(message)
            } else {
                CompletionErrorKind::RateLimited {
                    message,
                    retry_after_ms: retry_after_ms(headers),
                }
            }
        }
        408 | 504 => CompletionErrorKind::Timeout(message),
        _ => CompletionErrorKind::Unknown(message),
    }
}

/// Classify a failure that happened before a response arrived.
pub fn classify_transport(error: &reqwest::Error) -> CompletionErrorKind {
    if error.is_timeout() {
        CompletionErrorKind::Timeout(error.to_string())
    } else {
        CompletionErrorKind::Unknown(format!("Request failed: {}", error))
    }
}

fn retry_after_ms(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn auth_statuses_are_unauthenticated() {
        let headers = HeaderMap::new();
        for code in [401, 403] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(matches!(
                classify_status(status, &headers, "denied"),
                CompletionErrorKind::Unauthenticated(_)
            ));
        }
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("3"));
        let kind = classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, "slow down");
        assert_eq!(
            kind,
            CompletionErrorKind::RateLimited {
                message: "HTTP 429: slow down".into(),
                retry_after_ms: Some(3000),
            }
        );
    }

    #[test]
    fn huge_retry_after_saturates() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("18446744073709551615"));
        let kind = classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, "later");
        assert!(matches!(
            kind,
            CompletionErrorKind::RateLimited {
                retry_after_ms: Some(u64::MAX),
                ..
            }
        ));
    }

    #[test]
    fn quota_wording_is_not_retryable() {
        let kind = classify_status(
            StatusCode::TOO_MANY_REQUESTS,
            &HeaderMap::new(),
            r#"{"error":{"code":"insufficient_quota"}}"#,
        );
        assert!(matches!(kind, CompletionErrorKind::QuotaExceeded(_)));
        assert!(!kind.is_retryable());
    }

    #[test]
    fn gateway_timeout_and_server_errors() {
        let headers = HeaderMap::new();
        assert!(matches!(
            classify_status(StatusCode::GATEWAY_TIMEOUT, &headers, ""),
            CompletionErrorKind::Timeout(_)
        ));
        let kind = classify_status(StatusCode::SERVICE_UNAVAILABLE, &headers, "overloaded");
        assert!(matches!(kind, CompletionErrorKind::Unknown(_)));
        assert!(kind.is_retryable());
    }
}
