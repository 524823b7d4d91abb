//! Exponential backoff for transient fetch failures.
//!
//! Throttling (429), server errors (5xx), timeouts and connection failures
//! are retried. Client errors, parse and browser failures are returned on
//! the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::SourceError;

/// Upper bound on a single backoff sleep, `Retry-After` included.
const MAX_DELAY_SECS: u64 = 30;

fn is_retriable(err: &SourceError) -> bool {
    match err {
        SourceError::RateLimited { .. } => true,
        SourceError::UnexpectedStatus { status, .. } => (500..600).contains(status),
        SourceError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        SourceError::Parse { .. }
        | SourceError::Browser(_)
        | SourceError::Timeout { .. }
        | SourceError::Unavailable(_) => false,
    }
}

/// Seconds to wait before retry `n` (0-based): `backoff_base_secs * 2^n`,
/// stretched to any `Retry-After` the host sent, and never more than
/// [`MAX_DELAY_SECS`].
fn backoff_delay(err: &SourceError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let exponential = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    let wanted = match err {
        SourceError::RateLimited {
            retry_after_secs, ..
        } => exponential.max(*retry_after_secs),
        _ => exponential,
    };
    wanted.min(MAX_DELAY_SECS)
}

/// Run `operation`, retrying transient errors up to `max_retries` more
/// times.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        if !is_retriable(&err) || attempt >= max_retries {
            return Err(err);
        }

        let delay_secs = backoff_delay(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient fetch error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use super::*;

    fn throttled() -> SourceError {
        SourceError::RateLimited {
            host: "www.sogou.com".to_owned(),
            retry_after_secs: 0,
        }
    }

    #[test]
    fn delay_doubles_and_respects_retry_after() {
        let http_like = SourceError::UnexpectedStatus {
            status: 500,
            url: String::new(),
        };
        assert_eq!(backoff_delay(&http_like, 0, 1), 1);
        assert_eq!(backoff_delay(&http_like, 3, 1), 8);

        let slow_down = SourceError::RateLimited {
            host: "m.weibo.cn".to_owned(),
            retry_after_secs: 30,
        };
        assert_eq!(backoff_delay(&slow_down, 1, 1), 30);
        assert_eq!(backoff_delay(&slow_down, 6, 1), MAX_DELAY_SECS);
    }

    #[test]
    fn delay_is_capped() {
        let day_long = SourceError::RateLimited {
            host: "m.weibo.cn".to_owned(),
            retry_after_secs: 86_400,
        };
        assert_eq!(backoff_delay(&day_long, 0, 1), MAX_DELAY_SECS);

        let server = SourceError::UnexpectedStatus {
            status: 503,
            url: String::new(),
        };
        assert_eq!(backoff_delay(&server, 40, 1), MAX_DELAY_SECS);
    }

    #[test]
    fn only_server_statuses_are_transient() {
        let status = |status| SourceError::UnexpectedStatus {
            status,
            url: String::new(),
        };
        assert!(is_retriable(&status(500)));
        assert!(is_retriable(&status(503)));
        assert!(!is_retriable(&status(404)));
        assert!(!is_retriable(&SourceError::Parse {
            context: "search page".to_owned(),
            reason: "no results".to_owned(),
        }));
    }

    #[tokio::test]
    async fn connection_failures_are_retried() {
        let client = reqwest::Client::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(1, 0, || {
            let c = Arc::clone(&c);
            let client = client.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                client.get("http://127.0.0.1:1/").send().await?;
                Ok::<_, SourceError>(())
            }
        })
        .await;
        assert!(matches!(result, Err(SourceError::Http(ref e)) if e.is_connect()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn malformed_request_errors_are_not_retried() {
        let client = reqwest::Client::new();
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            let client = client.clone();
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                client.get("not a url").send().await?;
                Ok::<_, SourceError>(())
            }
        })
        .await;
        assert!(matches!(result, Err(SourceError::Http(ref e)) if e.is_builder()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_throttling_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                if c.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(throttled())
                } else {
                    Ok::<_, SourceError>("page")
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), "page");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(2, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(throttled())
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(result, Err(SourceError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn status_errors_are_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(3, 0, || {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(SourceError::UnexpectedStatus {
                    status: 403,
                    url: "https://news.qq.com/a/1".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(SourceError::UnexpectedStatus { status: 403, .. })));
    }
}
