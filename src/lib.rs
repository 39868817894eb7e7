pub mod buffer;
pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod flush;
pub mod init;
pub mod layer;
pub mod noop_transport;
pub mod record;
mod scheduler;
pub mod source;
pub mod stats;
pub mod transport;

#[cfg(feature = "http")]
pub mod http;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientState, LogClient};
pub use config::ClientConfig;
pub use error::{ConfigError, TransportError};
pub use flush::FlushOutcome;
pub use record::{LogEntry, Metadata, SourceInfo};
pub use transport::Transport;
