//! Transport configuration.
//!
//! Defaults match the constants in `retry` and `transport`; a TOML file or
//! `CONSOLE_*` environment variables may override any of them.

use std::time::Duration;

use serde::Deserialize;

use crate::retry::{RetryPolicy, MAX_RETRIES, RETRY_BASE_DELAY};
use crate::transport::DEFAULT_TIMEOUT;

pub const ENV_BASE_URL: &str = "CONSOLE_API_URL";
pub const ENV_MAX_RETRIES: &str = "CONSOLE_MAX_RETRIES";
pub const ENV_RETRY_BASE_DELAY_MS: &str = "CONSOLE_RETRY_BASE_DELAY_MS";
pub const ENV_TIMEOUT_MS: &str = "CONSOLE_TIMEOUT_MS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment variable {name} must be an integer, got {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Prepended to every request path. Empty means paths are used as-is.
    pub base_url: String,
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub default_timeout_ms: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_retries: MAX_RETRIES,
            retry_base_delay_ms: millis(RETRY_BASE_DELAY),
            default_timeout_ms: millis(DEFAULT_TIMEOUT),
        }
    }
}

impl TransportConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(raw)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by whichever `CONSOLE_*` variables are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_env(ENV_MAX_RETRIES, raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_BASE_DELAY_MS) {
            config.retry_base_delay_ms = parse_env(ENV_RETRY_BASE_DELAY_MS, raw)?;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.default_timeout_ms = parse_env(ENV_TIMEOUT_MS, raw)?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "default_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay_ms = millis(delay);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = millis(timeout);
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_timeout_ms)
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_env<T: std::str::FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { name, value: raw })
}
