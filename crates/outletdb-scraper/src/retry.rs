//! Retry utilities for locator page fetches.
//!
//! Transient failures (network errors, 429, 5xx) are retried with exponential
//! backoff. A 429 waits at least as long as the server's `Retry-After` asks.
//! Everything else is propagated immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Upper bound on a server-requested `Retry-After` wait.
const MAX_RETRY_AFTER_SECS: u64 = 300;

/// Returns `true` if `err` is worth another attempt after a backoff delay.
///
/// 404 and other 4xx statuses return the same answer on every attempt, so
/// they are not retried.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::RateLimited { .. } | ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status >= 500,
        ScraperError::NotFound { .. } | ScraperError::InvalidUrl { .. } => false,
    }
}

/// Seconds to wait before retry `attempt + 1`.
///
/// Exponential backoff, raised to the server's `Retry-After` (capped at
/// [`MAX_RETRY_AFTER_SECS`]) when the failure was a 429.
fn backoff_delay_secs(err: &ScraperError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let exponential = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ScraperError::RateLimited {
            retry_after_secs, ..
        } => exponential.max((*retry_after_secs).min(MAX_RETRY_AFTER_SECS)),
        _ => exponential,
    }
}

/// Executes `operation`, retrying transient errors with exponential backoff.
///
/// The wait before retry `n` (1-based) is `backoff_base_secs * 2^(n-1)`
/// seconds, or the server's `Retry-After` if that is longer. With
/// `max_retries = 3` the operation runs at most 4 times; once retries are
/// exhausted the last error is returned.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
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

        let delay_secs = backoff_delay_secs(&err, attempt, backoff_base_secs);
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
