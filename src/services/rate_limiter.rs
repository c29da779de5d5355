//! Rate limiting and retry logic for catalog API calls
//!
//! The catalog only tolerates a low per-minute request rate, so every HTTP
//! call waits for a governor permit first. Retries then run as an explicit
//! attempt loop that branches on the typed [SearchFailure].

use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use reqwest::{Client, Response};
use tracing::{debug, warn};

use super::catalog::SearchFailure;

/// Configuration for rate limiting
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub requests_per_minute: u32,
    pub timeout: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 60,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A rate-limited HTTP client wrapper
pub struct RateLimitedClient {
    client: Client,
    limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
    name: String,
}

impl RateLimitedClient {
    pub fn new(name: &str, user_agent: &str, config: RateLimitConfig) -> Result<Self> {
        let quota =
            Quota::per_minute(NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN));

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            limiter: Arc::new(RateLimiter::direct(quota)),
            name: name.to_string(),
        })
    }

    /// Wait for rate limit and make a GET request with headers and query parameters
    pub async fn get_with_headers_and_query<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        query: &T,
    ) -> reqwest::Result<Response> {
        self.wait_for_permit().await;
        debug!(client = %self.name, url = %url, "Making rate-limited GET request");

        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(*key, *value);
        }
        request.query(query).send().await
    }

    pub async fn wait_for_permit(&self) {
        self.limiter.until_ready().await;
    }
}

/// Retry policy for a single catalog query
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Wait between attempts after a non-429 failure
    pub retry_delay: Duration,
    /// First wait after a 429; doubles on each further 429
    pub rate_limit_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_millis(2000),
            rate_limit_base: Duration::from_millis(5000),
        }
    }
}

impl RetryPolicy {
    /// Deterministic doubling schedule for 429 responses.
    pub fn rate_limit_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: self.rate_limit_base,
            randomization_factor: 0.0,
            multiplier: 2.0,
            max_interval: self.rate_limit_base * 16,
            max_elapsed_time: None,
            ..Default::default()
        };
        backoff.reset();
        backoff
    }
}

/// Run a catalog operation under the retry policy.
///
/// 404 is returned immediately; every other failure is retried until the
/// attempt budget is spent, and the last failure is returned.
pub async fn retry_async<T, Fut, F>(
    operation: F,
    policy: &RetryPolicy,
    operation_name: &str,
) -> Result<T, SearchFailure>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, SearchFailure>>,
{
    let mut attempts = 0;
    let mut rate_limit_backoff = policy.rate_limit_backoff();

    loop {
        attempts += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_not_found() => return Err(e),
            Err(e) => {
                if attempts >= policy.max_attempts {
                    warn!(
                        operation = %operation_name,
                        attempts = attempts,
                        error = %e,
                        "Operation failed after max retries"
                    );
                    return Err(e);
                }

                let wait = match e {
                    SearchFailure::RateLimited => rate_limit_backoff
                        .next_backoff()
                        .unwrap_or(rate_limit_backoff.max_interval),
                    _ => policy.retry_delay,
                };

                warn!(
                    operation = %operation_name,
                    attempt = attempts,
                    error = %e,
                    retry_in_ms = wait.as_millis() as u64,
                    "Operation failed, retrying"
                );
                tokio::time::sleep(wait).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            retry_delay: Duration::from_millis(1),
            rate_limit_base: Duration::from_millis(1),
        }
    }

    #[test]
    fn test_rate_limit_schedule_doubles() {
        let policy = RetryPolicy::default();
        let mut backoff = policy.rate_limit_backoff();
        let mut next_ms = || backoff.next_backoff().map(|d| d.as_millis());
        assert_eq!(next_ms(), Some(5000));
        assert_eq!(next_ms(), Some(10000));
        assert_eq!(next_ms(), Some(20000));
    }

    #[test]
    fn test_retry_until_success() {
        let calls = &AtomicU32::new(0);
        let result = tokio_test::block_on(retry_async(
            || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(SearchFailure::Transport("reset".into()))
                } else {
                    Ok(7)
                }
            },
            &fast_policy(),
            "test",
        ));
        assert_eq!(result, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = retry_async(
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SearchFailure::RateLimited)
            },
            &fast_policy(),
            "test",
        )
        .await;
        assert_eq!(result, Err(SearchFailure::RateLimited));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_waits_on_schedule_and_other_failures_on_fixed_delay() {
        let policy = RetryPolicy::default();

        let started = tokio::time::Instant::now();
        let result: Result<(), _> = retry_async(|| async { Err(SearchFailure::RateLimited) }, &policy, "test").await;
        assert_eq!(result, Err(SearchFailure::RateLimited));
        // 5 s then 10 s before the third attempt
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(15), "{waited:?}");
        assert!(waited < Duration::from_millis(15_100), "{waited:?}");

        let started = tokio::time::Instant::now();
        let result: Result<(), _> =
            retry_async(|| async { Err(SearchFailure::Http { status: 503 }) }, &policy, "test").await;
        assert_eq!(result, Err(SearchFailure::Http { status: 503 }));
        // Two fixed 2 s delays
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(4), "{waited:?}");
        assert!(waited < Duration::from_millis(4_100), "{waited:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mixed_failures_pick_wait_per_failure() {
        let policy = RetryPolicy::default();
        let calls = &AtomicU32::new(0);

        let started = tokio::time::Instant::now();
        let result = retry_async(
            || async move {
                match calls.fetch_add(1, Ordering::SeqCst) {
                    0 => Err(SearchFailure::RateLimited),
                    1 => Err(SearchFailure::Transport("reset".into())),
                    _ => Ok("done"),
                }
            },
            &policy,
            "test",
        )
        .await;
        assert_eq!(result, Ok("done"));
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(7), "{waited:?}");
        assert!(waited < Duration::from_millis(7_100), "{waited:?}");
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<(), _> = retry_async(
            || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(SearchFailure::Http { status: 404 })
            },
            &fast_policy(),
            "test",
        )
        .await;
        assert!(result.unwrap_err().is_not_found());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
