use crate::error::TransportError;
use crate::record::{LogEntry, SourceInfo};
use crate::transport::Transport;
use async_trait::async_trait;

/// A transport that accepts every batch and drops it.
///
/// Useful for measuring the overhead of the client itself without any
/// external I/O. `validate` always fails, so entries fall back to the
/// configured default source.
#[derive(Clone, Default)]
pub struct NoopTransport;

#[async_trait]
impl Transport for NoopTransport {
    async fn validate(&self) -> Result<SourceInfo, TransportError> {
        Err(TransportError::Status {
            status: 404,
            body: "noop transport has no source".to_string(),
        })
    }

    async fn ship(&self, _batch: &[LogEntry]) -> Result<(), TransportError> {
        Ok(())
    }
}
