/// Environment variable names read by
/// [`ClientConfig::from_env`](crate::config::ClientConfig::from_env).
///
/// The core client types never touch the environment themselves; these
/// are helpers for services that prefer twelve-factor style setup.

/// API key sent as `X-API-Key` on every request.
pub const LOGSHIP_API_KEY_ENV: &str = "LOGSHIP_API_KEY";

/// Base URL of the ingestion service, e.g. `https://logs.example.com`.
pub const LOGSHIP_BASE_URL_ENV: &str = "LOGSHIP_BASE_URL";

/// Entry count that triggers an immediate flush.
pub const LOGSHIP_BATCH_SIZE_ENV: &str = "LOGSHIP_BATCH_SIZE";

/// Periodic flush cadence in milliseconds.
pub const LOGSHIP_FLUSH_INTERVAL_MS_ENV: &str = "LOGSHIP_FLUSH_INTERVAL_MS";

/// Per-request deadline in milliseconds.
pub const LOGSHIP_REQUEST_TIMEOUT_MS_ENV: &str = "LOGSHIP_REQUEST_TIMEOUT_MS";

/// Source name used when the remote source cannot be resolved.
pub const LOGSHIP_DEFAULT_SOURCE_ENV: &str = "LOGSHIP_DEFAULT_SOURCE";

/// Read an environment variable, treating empty values as unset.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
