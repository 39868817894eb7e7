use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the client handle and its flush worker.
#[derive(Debug, Default)]
pub struct ClientStats {
    /// Entries accepted by `log()` while the client was running.
    pub logged: AtomicU64,
    /// Entries acknowledged by the ingestion service.
    pub delivered: AtomicU64,
    /// Send attempts that failed and were re-queued.
    pub failed_sends: AtomicU64,
    /// Entries lost to capacity truncation or logged after close.
    pub dropped: AtomicU64,
}

/// Point-in-time copy of [`ClientStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub logged: u64,
    pub delivered: u64,
    pub failed_sends: u64,
    pub dropped: u64,
}

impl ClientStats {
    pub(crate) fn add(counter: &AtomicU64, n: usize) {
        counter.fetch_add(n as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            logged: self.logged.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed_sends: self.failed_sends.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
        }
    }
}
