//! HTTP client for the store-locator page.

use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::ScraperError;
use crate::retry::retry_with_backoff;

/// Used when a 429 carries no parseable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Fetches the locator page HTML.
///
/// 404 and other non-2xx responses surface as typed errors. Transient
/// failures (429, 5xx, network errors) are retried with exponential backoff
/// up to `max_retries` additional attempts.
pub struct LocatorClient {
    client: Client,
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl LocatorClient {
    /// Creates a `LocatorClient` with configured timeout, `User-Agent`, and retry policy.
    ///
    /// Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// GETs `url` and returns the body as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] if `url` does not parse (not retried).
    /// - [`ScraperError::RateLimited`] for HTTP 429 after all retries.
    /// - [`ScraperError::NotFound`] for HTTP 404 (not retried).
    /// - [`ScraperError::UnexpectedStatus`] for any other non-2xx status (5xx retried, 4xx not).
    /// - [`ScraperError::Http`] for network or TLS failures after all retries.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        let domain = parsed.host_str().unwrap_or_default().to_owned();

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let parsed = parsed.clone();
            let domain = domain.clone();
            async move {
                let response = self
                    .client
                    .get(parsed.clone())
                    .header(reqwest::header::ACCEPT, "text/html,application/xhtml+xml")
                    .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                    .send()
                    .await?;
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(ScraperError::RateLimited {
                        domain,
                        retry_after_secs,
                    });
                }

                if status == StatusCode::NOT_FOUND {
                    return Err(ScraperError::NotFound {
                        url: parsed.to_string(),
                    });
                }

                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: parsed.to_string(),
                    });
                }

                let body = response.text().await?;
                tracing::debug!(url = %parsed, bytes = body.len(), "fetched locator page");
                Ok(body)
            }
        })
        .await
    }
}
