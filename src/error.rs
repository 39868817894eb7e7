use std::time::Duration;

/// Error returned by a [`Transport`](crate::transport::Transport) when a
/// validate or ship request does not succeed.
///
/// These never reach the caller of [`LogClient::log`](crate::client::LogClient::log):
/// the flush engine turns them into a re-queued batch and a diagnostic.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[cfg(feature = "http")]
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Error type returned when building a [`ClientConfig`](crate::config::ClientConfig)
/// from the environment.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("required setting {0} is not set")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
