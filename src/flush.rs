use crate::buffer::LogBuffer;
use crate::error::TransportError;
use crate::source::SourceResolver;
use crate::stats::ClientStats;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Result of a single [`Flusher::flush`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Nothing was buffered; no request was made.
    Empty,
    /// The batch of this many entries was acknowledged.
    Delivered(usize),
    /// The send failed; `restored` entries went back to the buffer and
    /// `dropped` were shed by the capacity limit.
    Failed { restored: usize, dropped: usize },
}

/// Drains the buffer and ships it, putting the batch back on failure.
///
/// Errors never leave this type: they are logged and counted, and the
/// batch waits for the next scheduled or threshold-triggered flush.
pub struct Flusher {
    buffer: Arc<LogBuffer>,
    transport: Arc<dyn Transport>,
    resolver: Arc<SourceResolver>,
    stats: Arc<ClientStats>,
    request_timeout: Duration,
}

impl Flusher {
    pub fn new(
        buffer: Arc<LogBuffer>,
        transport: Arc<dyn Transport>,
        resolver: Arc<SourceResolver>,
        stats: Arc<ClientStats>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            buffer,
            transport,
            resolver,
            stats,
            request_timeout,
        }
    }

    pub async fn flush(&self) -> FlushOutcome {
        if self.buffer.is_empty() {
            return FlushOutcome::Empty;
        }

        self.resolver.resolve().await;

        let batch = self.buffer.drain_all();
        if batch.is_empty() {
            return FlushOutcome::Empty;
        }
        let n = batch.len();

        let result = match tokio::time::timeout(self.request_timeout, self.transport.ship(&batch)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(self.request_timeout)),
        };

        match result {
            Ok(()) => {
                ClientStats::add(&self.stats.delivered, n);
                debug!(entries = n, "flushed log batch");
                FlushOutcome::Delivered(n)
            }
            Err(e) => {
                let dropped = self.buffer.restore(batch);
                ClientStats::add(&self.stats.failed_sends, 1);
                ClientStats::add(&self.stats.dropped, dropped);
                warn!(error = %e, entries = n, dropped, "failed to ship log batch, will retry");
                FlushOutcome::Failed {
                    restored: n,
                    dropped,
                }
            }
        }
    }
}
