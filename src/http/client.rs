//! JSON-over-HTTP transport for the GraphQL client
//!
//! Every attempt waits on the rate limiter first. 429 responses sleep for
//! `Retry-After`. Retryable 5xx responses and connect or timeout failures
//! back off until `max_retries` is spent. Anything else fails at once.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::error::{Error, Result};
use crate::types::BackoffType;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Seconds to wait on a 429 without a usable `Retry-After`
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Transport settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_type: BackoffType,
    /// `None` disables client-side pacing
    pub rate_limit: Option<RateLimiterConfig>,
    /// Headers sent with every request
    pub default_headers: HashMap<String, String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(300),
            max_retries: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: Some(RateLimiterConfig::default()),
            default_headers: HashMap::new(),
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    inner: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = timeout;
        self
    }

    pub fn max_retries(mut self, retries: u32) -> Self {
        self.inner.max_retries = retries;
        self
    }

    /// Backoff shape and its bounds
    pub fn backoff(mut self, kind: BackoffType, initial: Duration, max: Duration) -> Self {
        self.inner.backoff_type = kind;
        self.inner.initial_backoff = initial;
        self.inner.max_backoff = max;
        self
    }

    pub fn rate_limit(mut self, limit: RateLimiterConfig) -> Self {
        self.inner.rate_limit = Some(limit);
        self
    }

    pub fn no_rate_limit(mut self) -> Self {
        self.inner.rate_limit = None;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.inner.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.inner
    }
}

/// What a single attempt resolved to
enum Attempt {
    Done(Response),
    Throttled { wait: Duration },
    Transient(Error),
    Failed(Error),
}

/// POSTs JSON with pacing and retries
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// POST `body` to `url` and decode the JSON response
    pub async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        let response = self.post_with_retry(url, body).await?;
        let text = response.text().await?;
        debug!(bytes = text.len(), %url, "Response received");
        Ok(serde_json::from_str(&text)?)
    }

    async fn post_with_retry(&self, url: &str, body: &Value) -> Result<Response> {
        let attempts = self.config.max_retries + 1;

        for attempt in 0..attempts {
            let retries_left = attempt + 1 < attempts;

            match self.attempt(url, body).await {
                Attempt::Done(response) => return Ok(response),
                Attempt::Failed(e) => return Err(e),
                Attempt::Throttled { wait } if retries_left => {
                    warn!(
                        attempt = attempt + 1,
                        of = attempts,
                        "Throttled by the API, waiting {}s",
                        wait.as_secs()
                    );
                    tokio::time::sleep(wait).await;
                }
                Attempt::Throttled { wait } => {
                    return Err(Error::RateLimited {
                        retry_after_seconds: wait.as_secs(),
                    });
                }
                Attempt::Transient(e) if retries_left => {
                    let delay = self.calculate_backoff(attempt);
                    warn!(
                        attempt = attempt + 1,
                        of = attempts,
                        "{e}, retrying in {delay:?}"
                    );
                    tokio::time::sleep(delay).await;
                }
                Attempt::Transient(e) => return Err(e),
            }
        }

        Err(Error::MaxRetriesExceeded {
            max_retries: self.config.max_retries,
        })
    }

    async fn attempt(&self, url: &str, body: &Value) -> Attempt {
        if let Some(limiter) = &self.rate_limiter {
            limiter.wait().await;
        }

        let request = self
            .config
            .default_headers
            .iter()
            .fold(self.client.post(url), |req, (name, value)| {
                req.header(name.as_str(), value.as_str())
            })
            .json(body);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return Attempt::Transient(Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                })
            }
            Err(e) if e.is_connect() => return Attempt::Transient(Error::Http(e)),
            Err(e) => return Attempt::Failed(Error::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Throttled {
                wait: Duration::from_secs(retry_after_secs(&response)),
            };
        }
        if status.is_success() {
            return Attempt::Done(response);
        }

        let text = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), text);
        if error.is_retryable() {
            Attempt::Transient(error)
        } else {
            Attempt::Failed(error)
        }
    }

    /// Delay before retry number `attempt + 1`, capped at `max_backoff`
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let base = self.config.initial_backoff;
        let delay = match self.config.backoff_type {
            BackoffType::Constant => base,
            BackoffType::Linear => base.saturating_mul(attempt + 1),
            BackoffType::Exponential => base.saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.config.max_backoff)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("timeout", &self.config.timeout)
            .field("max_retries", &self.config.max_retries)
            .field("has_rate_limiter", &self.has_rate_limiter())
            .finish_non_exhaustive()
    }
}

/// `Retry-After` in whole seconds, rounded up
fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .map_or(DEFAULT_RETRY_AFTER_SECS, |secs| secs.max(0.0).ceil() as u64)
}
