use crate::buffer::LogBuffer;
use crate::config::ClientConfig;
use crate::flush::{FlushOutcome, Flusher};
use crate::record::{EntryBuilder, Metadata, SourceInfo};
use crate::scheduler::{self, Command, COMMAND_BUFFER};
use crate::source::SourceResolver;
use crate::stats::{ClientStats, StatsSnapshot};
use crate::transport::Transport;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Lifecycle of a [`LogClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    /// Timer armed; entries are buffered and shipped.
    Running,
    /// `close()` is performing the final flush.
    Closing,
    /// Terminal. `log()` still returns a request id but discards the entry.
    Closed,
}

impl ClientState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ClientState::Running,
            1 => ClientState::Closing,
            _ => ClientState::Closed,
        }
    }
}

struct Inner {
    builder: EntryBuilder,
    buffer: Arc<LogBuffer>,
    resolver: Arc<SourceResolver>,
    stats: Arc<ClientStats>,
    batch_size: usize,
    state: AtomicU8,
    tx: mpsc::Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

/// Buffers structured log entries and ships them to the ingestion service
/// in batches.
///
/// A flush happens when the buffer reaches `batch_size`, on every
/// `flush_interval` tick, on [`LogClient::flush`], and once more on
/// [`LogClient::close`]. Failed sends are re-queued; nothing on the logging
/// path ever returns an error to the caller.
///
/// The handle is cheap to clone. Dropping the last clone without calling
/// `close()` still triggers a final flush from the background worker, but
/// nothing waits for it.
#[derive(Clone)]
pub struct LogClient {
    inner: Arc<Inner>,
}

impl LogClient {
    /// Create a client that talks HTTP to `config.base_url` and start its
    /// flush worker.
    ///
    /// Must be called from within a Tokio runtime.
    #[cfg(feature = "http")]
    pub fn new(config: ClientConfig) -> Self {
        let transport = crate::http::HttpTransport::new(&config.base_url, &config.api_key);
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom [`Transport`] and start its flush
    /// worker. Source resolution begins immediately in the background.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let config = config.normalized();

        let buffer = Arc::new(LogBuffer::default());
        let stats = Arc::new(ClientStats::default());
        let resolver = Arc::new(SourceResolver::new(
            Arc::clone(&transport),
            config.request_timeout,
        ));

        let resolver_bg = Arc::clone(&resolver);
        tokio::spawn(async move {
            resolver_bg.resolve().await;
        });

        let flusher = Flusher::new(
            Arc::clone(&buffer),
            transport,
            Arc::clone(&resolver),
            Arc::clone(&stats),
            config.request_timeout,
        );
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let worker = scheduler::start(flusher, config.flush_interval, rx);

        LogClient {
            inner: Arc::new(Inner {
                builder: EntryBuilder::new(config.default_source),
                buffer,
                resolver,
                stats,
                batch_size: config.batch_size,
                state: AtomicU8::new(0),
                tx,
                worker: Mutex::new(Some(worker)),
            }),
        }
    }

    /// Record one entry and return its request id.
    ///
    /// Never blocks on the network. When the buffer reaches the batch
    /// size a flush is queued for the background worker.
    pub fn log(
        &self,
        level: &str,
        message: &str,
        metadata: Metadata,
        source: Option<&str>,
    ) -> String {
        let inner = &self.inner;
        let entry = inner
            .builder
            .build(level, message, metadata, source, inner.resolver.current());
        let request_id = entry.request_id();

        if self.state() != ClientState::Running {
            ClientStats::add(&inner.stats.dropped, 1);
            debug!(request_id = %request_id, "log client closed, discarding entry");
            return request_id;
        }

        // close() may have sealed the buffer since the state check above.
        let Some(len) = inner.buffer.append(entry) else {
            ClientStats::add(&inner.stats.dropped, 1);
            debug!(request_id = %request_id, "log client closed, discarding entry");
            return request_id;
        };

        ClientStats::add(&inner.stats.logged, 1);
        if len >= inner.batch_size {
            // A full channel already holds a pending flush.
            let _ = inner.tx.try_send(Command::Flush(None));
        }
        request_id
    }

    pub fn info(&self, message: &str, metadata: Metadata, source: Option<&str>) -> String {
        self.log("info", message, metadata, source)
    }

    pub fn warn(&self, message: &str, metadata: Metadata, source: Option<&str>) -> String {
        self.log("warn", message, metadata, source)
    }

    pub fn error(&self, message: &str, metadata: Metadata, source: Option<&str>) -> String {
        self.log("error", message, metadata, source)
    }

    pub fn debug(&self, message: &str, metadata: Metadata, source: Option<&str>) -> String {
        self.log("debug", message, metadata, source)
    }

    /// Ask the worker to flush now and wait for that attempt to finish.
    pub async fn flush(&self) -> FlushOutcome {
        let (ack, done) = oneshot::channel();
        if self.inner.tx.send(Command::Flush(Some(ack))).await.is_err() {
            return FlushOutcome::Empty;
        }
        done.await.unwrap_or(FlushOutcome::Empty)
    }

    /// Stop the periodic timer, perform one final flush and wait for it.
    ///
    /// Entries still buffered afterwards, because the final send failed or
    /// a concurrent `log()` raced the shutdown, are discarded and counted
    /// in [`StatsSnapshot::dropped`].
    ///
    /// Only the first call does any work; later calls return
    /// [`FlushOutcome::Empty`] immediately.
    pub async fn close(&self) -> FlushOutcome {
        let inner = &self.inner;
        if inner
            .state
            .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return FlushOutcome::Empty;
        }

        let (ack, done) = oneshot::channel();
        let outcome = match inner.tx.send(Command::Close(ack)).await {
            Ok(()) => done.await.unwrap_or(FlushOutcome::Empty),
            Err(_) => FlushOutcome::Empty,
        };

        let worker = inner
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }

        // Whatever the final flush could not ship is never sent.
        let leftovers = inner.buffer.seal();
        if !leftovers.is_empty() {
            ClientStats::add(&inner.stats.dropped, leftovers.len());
            warn!(dropped = leftovers.len(), "log client closed with undelivered entries");
        }

        inner.state.store(2, Ordering::Release);
        info!(?outcome, "log client closed");
        outcome
    }

    /// Wait for source resolution and return the resolved identity, if any.
    pub async fn source_info(&self) -> Option<SourceInfo> {
        self.inner.resolver.resolve().await.cloned()
    }

    pub fn state(&self) -> ClientState {
        ClientState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    /// Number of entries waiting to be shipped.
    pub fn buffered_len(&self) -> usize {
        self.inner.buffer.len()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.inner.stats.snapshot()
    }
}
