//! Transport-level retry with exponential backoff.
//!
//! Only rate-limited responses are retried. The paging loop in
//! [`crate::pagination`] sits on top of this and never sees the intermediate
//! 429s; it only sees the final response once retries are exhausted.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

/// Backoff strategy for retrying failed requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    /// Uses a fixed delay between retries.
    Fixed {
        /// Delay between retries.
        delay: Duration,
    },
    /// Uses an exponential delay between retries.
    ///
    /// The delay is calculated as `base * (factor ^ attempt)`.
    Exponential {
        /// The initial backoff duration.
        base: Duration,
        /// The multiplicative factor for each subsequent retry.
        factor: f64,
        /// The maximum duration to wait between retries.
        max: Duration,
        /// Whether to apply random jitter (+/- 50%) to the delay.
        jitter: bool,
    },
}

impl Default for Backoff {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_secs(5),
            factor: 2.0,
            max: Duration::from_secs(120),
            jitter: false,
        }
    }
}

impl Backoff {
    /// Calculate the delay for a given retry attempt (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        match self {
            Self::Fixed { delay } => delay,
            Self::Exponential {
                base,
                factor,
                max,
                jitter,
            } => {
                let scale = factor.powi(attempt as i32);
                let seconds = base.as_secs_f64() * scale;
                let capped_seconds = seconds.min(max.as_secs_f64());

                let mut delay = Duration::from_secs_f64(capped_seconds);

                if jitter {
                    let jitter_ms = (delay.as_millis() as f64 * 0.5) as u64;
                    let random_offset = fastrand::u64(0..=(jitter_ms * 2));
                    let total_ms =
                        delay.as_millis() as i64 + (random_offset as i64 - jitter_ms as i64);
                    delay = Duration::from_millis(total_ms.max(0) as u64);
                }

                delay
            }
        }
    }
}

/// Configuration for the automatic retry mechanism.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Total attempts = `max_retries + 1`.
    pub max_retries: u32,
    pub backoff: Backoff,
    /// HTTP status codes that trigger a retry.
    pub retry_on_status: Vec<u16>,
    /// Wait for the service's `Retry-After` instead of the backoff when given.
    pub respect_retry_after: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::rate_limited(2, Backoff::default())
    }
}

impl RetryConfig {
    /// Retry 429 responses only.
    pub fn rate_limited(max_retries: u32, backoff: Backoff) -> Self {
        Self {
            max_retries,
            backoff,
            retry_on_status: vec![429],
            respect_retry_after: true,
        }
    }

    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_on_status.contains(&status)
    }

    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff.delay(attempt)
    }

    /// Delay before the next attempt after `response`.
    pub fn delay_after(&self, response: &HttpResponse, attempt: u32) -> Duration {
        match response.retry_after {
            Some(retry_after) if self.respect_retry_after => retry_after,
            _ => self.delay_for_attempt(attempt),
        }
    }
}

/// Wraps a transport and re-sends requests whose status is retryable.
///
/// Transport errors are returned as-is without retrying.
#[derive(Clone)]
pub struct RetryingHttpClient {
    inner: Arc<dyn HttpClient>,
    config: RetryConfig,
}

impl RetryingHttpClient {
    pub fn new(inner: Arc<dyn HttpClient>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }
}

impl HttpClient for RetryingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let mut attempt = 0;
            loop {
                let response = self.inner.execute(request.clone()).await?;
                if attempt >= self.config.max_retries
                    || !self.config.should_retry_status(response.status)
                {
                    return Ok(response);
                }

                let delay = self.config.delay_after(&response, attempt);
                attempt += 1;
                debug!(
                    status = response.status,
                    attempt,
                    max_retries = self.config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    url = %request.url,
                    "retrying request"
                );
                tokio::time::sleep(delay).await;
            }
        })
    }
}
