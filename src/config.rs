use std::time::Duration;

use crate::env::{
    env_opt, LOGSHIP_API_KEY_ENV, LOGSHIP_BASE_URL_ENV, LOGSHIP_BATCH_SIZE_ENV,
    LOGSHIP_DEFAULT_SOURCE_ENV, LOGSHIP_FLUSH_INTERVAL_MS_ENV, LOGSHIP_REQUEST_TIMEOUT_MS_ENV,
};
use crate::error::ConfigError;

pub const DEFAULT_BATCH_SIZE: usize = 100;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_SOURCE: &str = "default-client";

const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration of a [`LogClient`](crate::client::LogClient).
///
/// **Fields**
/// - `api_key`: credential sent as `X-API-Key` on validate and ingest
///   requests.
/// - `base_url`: service root; `/validate` and `/logs` are appended.
/// - `batch_size`: buffered entry count that triggers an immediate flush.
/// - `flush_interval`: cadence of the periodic flush, even when the
///   buffer is below `batch_size`.
/// - `request_timeout`: deadline after which an in-flight request is
///   aborted and treated as failed.
/// - `default_source`: source label used when neither the caller nor the
///   remote service supplies one.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub batch_size: usize,
    pub flush_interval: Duration,
    pub request_timeout: Duration,
    pub default_source: String,
}

impl ClientConfig {
    /// Build a configuration with default batching and timing settings.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            default_source: DEFAULT_SOURCE.to_string(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    pub fn with_default_source(mut self, default_source: impl Into<String>) -> Self {
        self.default_source = default_source.into();
        self
    }

    /// Load the configuration from `LOGSHIP_*` environment variables.
    ///
    /// `LOGSHIP_API_KEY` and `LOGSHIP_BASE_URL` are required; everything
    /// else falls back to the defaults above.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_opt)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(LOGSHIP_API_KEY_ENV).ok_or(ConfigError::Missing(LOGSHIP_API_KEY_ENV))?;
        let base_url =
            lookup(LOGSHIP_BASE_URL_ENV).ok_or(ConfigError::Missing(LOGSHIP_BASE_URL_ENV))?;

        let mut config = Self::new(api_key, base_url);
        if let Some(raw) = lookup(LOGSHIP_BATCH_SIZE_ENV) {
            let batch_size = parse_number(LOGSHIP_BATCH_SIZE_ENV, &raw)?;
            config.batch_size = usize::try_from(batch_size).map_err(|_| ConfigError::Invalid {
                key: LOGSHIP_BATCH_SIZE_ENV,
                value: raw.clone(),
            })?;
        }
        if let Some(raw) = lookup(LOGSHIP_FLUSH_INTERVAL_MS_ENV) {
            config.flush_interval =
                Duration::from_millis(parse_number(LOGSHIP_FLUSH_INTERVAL_MS_ENV, &raw)?);
        }
        if let Some(raw) = lookup(LOGSHIP_REQUEST_TIMEOUT_MS_ENV) {
            config.request_timeout =
                Duration::from_millis(parse_number(LOGSHIP_REQUEST_TIMEOUT_MS_ENV, &raw)?);
        }
        if let Some(source) = lookup(LOGSHIP_DEFAULT_SOURCE_ENV) {
            config.default_source = source;
        }
        Ok(config)
    }

    /// Enforce minimal thresholds to avoid degenerate configs.
    pub(crate) fn normalized(mut self) -> Self {
        self.batch_size = self.batch_size.max(1);
        self.flush_interval = self.flush_interval.max(MIN_INTERVAL);
        self.request_timeout = self.request_timeout.max(MIN_INTERVAL);
        self
    }
}

fn parse_number(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse::<u64>().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
