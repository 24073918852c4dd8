use std::time::Duration;

use crate::retry::{Backoff, RetryConfig};
use crate::ValidationError;

pub const DEFAULT_BASE_URL: &str = "https://api.openfigi.com";
pub const DEFAULT_RETRY_COUNT: u32 = 2;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_KEY: &str = "OPEN_FIGI_API_KEY";
pub const ENV_API_URL: &str = "OPEN_FIGI_API_URL";
pub const ENV_RAISE_ON_ERROR: &str = "OPEN_FIGI_RAISE_ON_ERROR";
pub const ENV_RETRY_COUNT: &str = "OPEN_FIGI_API_RETRY_COUNT";

/// Client settings. Resolved once and handed to [`crate::FigiClient::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Transport-level retries on HTTP 429.
    pub retry_count: u32,
    /// When false, service failures degrade to empty results instead of errors.
    pub raise_on_error: bool,
    pub backoff: Backoff,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            retry_count: DEFAULT_RETRY_COUNT,
            raise_on_error: false,
            backoff: Backoff::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Reads defaults from the `OPEN_FIGI_*` environment variables.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ValidationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            api_key: lookup(ENV_API_KEY).filter(|key| !key.is_empty()),
            ..Self::default()
        };

        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            config.base_url = url;
        }

        if let Some(raw) = lookup(ENV_RAISE_ON_ERROR) {
            config.raise_on_error =
                serde_json::from_str::<bool>(raw.trim()).map_err(|_| ValidationError::InvalidEnv {
                    name: ENV_RAISE_ON_ERROR,
                    value: raw.clone(),
                })?;
        }

        if let Some(raw) = lookup(ENV_RETRY_COUNT) {
            config.retry_count = raw.trim().parse().map_err(|_| ValidationError::InvalidEnv {
                name: ENV_RETRY_COUNT,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }

    /// An empty key counts as not supplied.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into()).filter(|key| !key.is_empty());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_raise_on_error(mut self, raise_on_error: bool) -> Self {
        self.raise_on_error = raise_on_error;
        self
    }

    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::rate_limited(self.retry_count, self.backoff)
    }

    /// Base URL without trailing slashes.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// The configured key, if any. Empty strings are treated as absent.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// Key prefix safe to put in logs.
    pub fn redacted_key(&self) -> String {
        match self.api_key() {
            Some(key) => key.chars().take(4).collect(),
            None => String::from("(not supplied)"),
        }
    }
}
