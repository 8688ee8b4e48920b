//! Core HTTP operations with rate limiting and retry logic
//!
//! Every request passes through a rate limiter and is retried with exponential
//! backoff on transport errors, HTTP 429 and HTTP 503.

use std::num::NonZeroU32;
use std::time::Duration;

use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Jitter, Quota, RateLimiter};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::constants::limits;
use crate::errors::{AuthError, AuthResult, FetchError, FetchResult};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler with resilience patterns
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
    bearer_token: Option<String>,
    max_retries: u32,
}

impl HttpHandler {
    /// Creates a new HttpHandler
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidConfig` if `rate_limit_rps` is zero
    pub fn new(
        client: Client,
        rate_limit_rps: u32,
        max_retries: u32,
        bearer_token: Option<String>,
    ) -> AuthResult<Self> {
        let rate_limiter = Self::build_rate_limiter(rate_limit_rps)?;
        Ok(Self {
            client,
            rate_limiter,
            bearer_token,
            max_retries,
        })
    }

    fn build_rate_limiter(rate_limit_rps: u32) -> AuthResult<DirectRateLimiter> {
        let rps = NonZeroU32::new(rate_limit_rps).ok_or_else(|| AuthError::InvalidConfig {
            reason: "Rate limit must be non-zero".to_string(),
        })?;
        Ok(RateLimiter::direct(Quota::per_second(rps)))
    }

    fn backoff_delay(attempt: u32) -> Duration {
        let factor = 2_u64.checked_pow(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(
            limits::RETRY_BASE_DELAY_MS
                .saturating_mul(factor)
                .min(limits::MAX_BACKOFF_DELAY_MS),
        )
    }

    /// Send a GET request, retrying transient failures
    ///
    /// Non-success statuses other than 429/503 are returned to the caller
    /// unchanged so it can map them to typed errors.
    pub async fn get_response(&self, url: &Url) -> FetchResult<reqwest::Response> {
        self.rate_limiter
            .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(50)))
            .await;

        let mut retries = 0;
        loop {
            let mut request = self.client.get(url.as_str());
            if let Some(token) = &self.bearer_token {
                request = request.bearer_auth(token);
            }

            match request.send().await {
                Ok(response) => {
                    let status = response.status();
                    let transient = status == StatusCode::TOO_MANY_REQUESTS
                        || status == StatusCode::SERVICE_UNAVAILABLE;

                    if !transient {
                        tracing::debug!("Fetched {} ({})", url, status);
                        return Ok(response);
                    }

                    if retries >= self.max_retries {
                        return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                            FetchError::RateLimitExceeded
                        } else {
                            FetchError::ServiceUnavailable
                        });
                    }

                    retries += 1;
                    let delay = Self::backoff_delay(retries);
                    tracing::warn!(
                        "Server responded {}. Backing off for {}ms",
                        status.as_u16(),
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if retries < self.max_retries => {
                    retries += 1;
                    let delay = Self::backoff_delay(retries);
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}. Retrying in {}ms",
                        retries,
                        self.max_retries,
                        e,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!("Request failed after {} retries: {}", self.max_retries, e);
                    return Err(FetchError::MaxRetriesExceeded {
                        max_retries: self.max_retries,
                    });
                }
            }
        }
    }

    /// Whether requests carry a bearer token
    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }
}
