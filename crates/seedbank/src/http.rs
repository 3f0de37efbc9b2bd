//! Shared HTTP client layer
//!
//! Every source adapter talks to its API through [`HttpClient`], which owns
//! a pooled `reqwest` client and applies one [`BackoffPolicy`] to all
//! requests: bounded retries on transient failures, longer retry-count
//! scaled waits on rate limiting, immediate failure on other client errors.

use anyhow::{anyhow, Context, Result};
use rand::Rng;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::warn;

/// Transient statuses worth retrying (beyond 429, which gets its own delay).
const TRANSIENT_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// Retry/backoff parameters shared by all source adapters.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Maximum attempts per request (first try included)
    pub max_attempts: u32,
    /// Delay after transient server errors and transport failures
    pub base_delay: Duration,
    /// Initial delay after a 429 response
    pub rate_limit_base: Duration,
    /// Additional delay per failed attempt after a 429 response
    pub rate_limit_step: Duration,
    /// Upper bound of the random jitter added to rate-limit delays
    pub jitter: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(3),
            rate_limit_base: Duration::from_secs(10),
            rate_limit_step: Duration::from_secs(5),
            jitter: Duration::from_secs(2),
        }
    }
}

impl BackoffPolicy {
    /// Delay before the next attempt. `attempt` is zero-based.
    pub fn delay_for(&self, attempt: u32, rate_limited: bool) -> Duration {
        if rate_limited {
            self.rate_limit_base + self.rate_limit_step * attempt + self.jitter_amount()
        } else {
            self.base_delay
        }
    }

    fn jitter_amount(&self) -> Duration {
        if self.jitter.is_zero() {
            return Duration::ZERO;
        }
        let bound = self.jitter.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(0..=bound))
    }
}

/// Outcome of a single request attempt.
enum Attempt {
    Success(String),
    RateLimited(String),
    Transient(String),
    Fatal(anyhow::Error),
}

/// HTTP client with bounded retry shared across adapter calls.
///
/// Cloning is cheap: the inner `reqwest::Client` is reference-counted and
/// safe for concurrent use, so batch workers clone freely.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    backoff: BackoffPolicy,
}

impl HttpClient {
    /// Create a client with a per-request timeout and a backoff policy.
    pub fn new(timeout: Duration, backoff: BackoffPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("seedbank/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { client, backoff })
    }

    pub fn backoff(&self) -> &BackoffPolicy {
        &self.backoff
    }

    /// GET returning the response body as text.
    pub async fn get_text(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        self.retry_loop(url, || self.client.get(url).query(query))
            .await
    }

    /// POST an urlencoded form, returning the response body as text.
    pub async fn post_form_text(&self, url: &str, form: &[(&str, String)]) -> Result<String> {
        self.retry_loop(url, || self.client.post(url).form(form))
            .await
    }

    async fn retry_loop<F>(&self, url: &str, build: F) -> Result<String>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_failure = String::new();

        for attempt in 0..self.backoff.max_attempts {
            let (failure, rate_limited) = match self.attempt(build()).await {
                Attempt::Success(body) => return Ok(body),
                Attempt::Fatal(e) => {
                    return Err(e.context(format!("Request to {} failed", url)));
                },
                Attempt::RateLimited(msg) => (msg, true),
                Attempt::Transient(msg) => (msg, false),
            };

            warn!(
                url = %url,
                attempt = attempt + 1,
                max_attempts = self.backoff.max_attempts,
                rate_limited,
                "Request failed: {}",
                failure
            );
            last_failure = failure;

            if attempt + 1 < self.backoff.max_attempts {
                tokio::time::sleep(self.backoff.delay_for(attempt, rate_limited)).await;
            }
        }

        Err(anyhow!(
            "Request to {} failed after {} attempts: {}",
            url,
            self.backoff.max_attempts,
            last_failure
        ))
    }

    async fn attempt(&self, builder: reqwest::RequestBuilder) -> Attempt {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Attempt::Transient(format!("transport error: {}", e)),
        };

        let status = response.status();
        if status.is_success() {
            return match response.text().await {
                Ok(body) => Attempt::Success(body),
                Err(e) => Attempt::Transient(format!("failed to read body: {}", e)),
            };
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            Attempt::RateLimited("HTTP 429 Too Many Requests".to_string())
        } else if TRANSIENT_STATUSES.contains(&status) {
            Attempt::Transient(format!("HTTP {}", status))
        } else {
            Attempt::Fatal(anyhow!("HTTP {} (not retryable)", status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_policy() -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: 5,
            base_delay: Duration::from_secs(3),
            rate_limit_base: Duration::from_secs(10),
            rate_limit_step: Duration::from_secs(5),
            jitter: Duration::ZERO,
        }
    }

    #[test]
    fn test_transient_delay_is_flat() {
        let policy = fixed_policy();
        assert_eq!(policy.delay_for(0, false), Duration::from_secs(3));
        assert_eq!(policy.delay_for(4, false), Duration::from_secs(3));
    }

    #[test]
    fn test_rate_limit_delay_scales_with_attempts() {
        let policy = fixed_policy();
        assert_eq!(policy.delay_for(0, true), Duration::from_secs(10));
        assert_eq!(policy.delay_for(1, true), Duration::from_secs(15));
        assert_eq!(policy.delay_for(3, true), Duration::from_secs(25));
    }

    #[test]
    fn test_rate_limit_jitter_stays_in_bounds() {
        let policy = BackoffPolicy {
            jitter: Duration::from_secs(2),
            ..fixed_policy()
        };
        for attempt in 0..5 {
            let delay = policy.delay_for(attempt, true);
            let floor = Duration::from_secs(10 + 5 * attempt as u64);
            assert!(delay >= floor);
            assert!(delay <= floor + Duration::from_secs(2));
        }
    }
}
