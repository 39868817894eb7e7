use crate::error::TransportError;
use crate::record::{LogEntry, SourceInfo};
use async_trait::async_trait;

/// Network seam between the client core and the ingestion service.
///
/// The core never talks to the network directly: source resolution calls
/// [`Transport::validate`] once, and every flush calls [`Transport::ship`]
/// with the drained batch. Timeouts are applied by the caller by dropping
/// the returned future, so implementations must be cancel-safe.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Look up the identity registered for the configured credential.
    ///
    /// **Returns**
    /// - `Ok(info)` if the service accepted the credential.
    /// - `Err(..)` on a non-2xx status, network error or malformed body.
    ///   The resolver does not retry.
    async fn validate(&self) -> Result<SourceInfo, TransportError>;

    /// Deliver one batch of entries, oldest first.
    ///
    /// **Returns**
    /// - `Ok(())` once the service acknowledged the batch with a 2xx.
    /// - `Err(..)` otherwise; the whole batch is treated as unsent and
    ///   re-queued by the flush engine.
    async fn ship(&self, batch: &[LogEntry]) -> Result<(), TransportError>;
}
