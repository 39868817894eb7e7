use crate::error::TransportError;
use crate::record::SourceInfo;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{info, warn};

/// Memoized, one-shot lookup of this client's remote source identity.
///
/// The validation request runs in its own task, so a caller that stops
/// waiting (a `timeout`, a lost `select!` branch) never cancels it.
/// Concurrent callers wait on the same cell and later callers reuse the
/// stored outcome. A failed lookup is stored as `None` and never retried
/// for the lifetime of the resolver.
pub struct SourceResolver {
    transport: Arc<dyn Transport>,
    timeout: Duration,
    cell: Arc<OnceCell<Option<SourceInfo>>>,
}

impl SourceResolver {
    pub fn new(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        Self {
            transport,
            timeout,
            cell: Arc::new(OnceCell::new()),
        }
    }

    pub async fn resolve(&self) -> Option<&SourceInfo> {
        if let Some(resolved) = self.cell.get() {
            return resolved.as_ref();
        }

        let cell = Arc::clone(&self.cell);
        let transport = Arc::clone(&self.transport);
        let timeout = self.timeout;
        let lookup = tokio::spawn(async move {
            cell.get_or_init(|| validate(transport, timeout)).await;
        });
        // A panicking transport leaves the cell empty; treat it as unresolved.
        let _ = lookup.await;

        self.current()
    }

    /// The resolved identity, without waiting for an in-flight lookup.
    pub fn current(&self) -> Option<&SourceInfo> {
        self.cell.get().and_then(Option::as_ref)
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.initialized()
    }
}

async fn validate(transport: Arc<dyn Transport>, timeout: Duration) -> Option<SourceInfo> {
    let outcome = match tokio::time::timeout(timeout, transport.validate()).await {
        Ok(result) => result,
        Err(_) => Err(TransportError::Timeout(timeout)),
    };
    match outcome {
        Ok(source) => {
            info!(source_id = %source.id, source_name = %source.name, "resolved log source");
            Some(source)
        }
        Err(e) => {
            warn!(error = %e, "source validation failed, using default source");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{sample_source, ScriptedTransport};

    #[tokio::test]
    async fn resolves_once_and_memoizes() {
        let transport = Arc::new(ScriptedTransport::accepting().with_source(sample_source()));
        let resolver = SourceResolver::new(transport.clone(), Duration::from_secs(1));

        assert!(resolver.current().is_none());
        assert_eq!(resolver.resolve().await, Some(&sample_source()));
        assert_eq!(resolver.resolve().await, Some(&sample_source()));
        assert_eq!(resolver.current(), Some(&sample_source()));
        assert_eq!(transport.validate_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_request() {
        let transport = Arc::new(
            ScriptedTransport::accepting()
                .with_source(sample_source())
                .with_validate_delay(Duration::from_millis(200)),
        );
        let resolver = SourceResolver::new(transport.clone(), Duration::from_secs(1));

        let (a, b, c) = tokio::join!(resolver.resolve(), resolver.resolve(), resolver.resolve());
        assert!(a.is_some() && b.is_some() && c.is_some());
        assert_eq!(transport.validate_count(), 1);
    }

    #[tokio::test]
    async fn failure_is_memoized_as_none() {
        let transport = Arc::new(ScriptedTransport::accepting());
        let resolver = SourceResolver::new(transport.clone(), Duration::from_secs(1));

        assert!(resolver.resolve().await.is_none());
        assert!(resolver.resolve().await.is_none());
        assert!(resolver.is_resolved());
        assert_eq!(transport.validate_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_validation_times_out_to_none() {
        let transport = Arc::new(
            ScriptedTransport::accepting()
                .with_source(sample_source())
                .with_validate_delay(Duration::from_secs(30)),
        );
        let resolver = SourceResolver::new(transport.clone(), Duration::from_millis(500));

        assert!(resolver.resolve().await.is_none());
        assert_eq!(transport.validate_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_caller_does_not_cause_a_second_request() {
        let transport = Arc::new(
            ScriptedTransport::accepting()
                .with_source(sample_source())
                .with_validate_delay(Duration::from_millis(100)),
        );
        let resolver = SourceResolver::new(transport.clone(), Duration::from_secs(1));

        let gave_up = tokio::time::timeout(Duration::from_millis(10), resolver.resolve()).await;
        assert!(gave_up.is_err());

        assert_eq!(resolver.resolve().await, Some(&sample_source()));
        assert_eq!(transport.validate_count(), 1);
    }
}
