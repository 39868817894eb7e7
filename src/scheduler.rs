use crate::flush::{FlushOutcome, Flusher};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

/// Threshold triggers beyond this many pending commands are dropped; a
/// flush is already queued by then.
pub(crate) const COMMAND_BUFFER: usize = 64;

/// Commands accepted by the flush worker.
pub(crate) enum Command {
    /// Flush now; the optional sender is completed with the outcome.
    Flush(Option<oneshot::Sender<FlushOutcome>>),
    /// Stop the timer, flush one last time, then exit.
    Close(oneshot::Sender<FlushOutcome>),
}

/// Spawn the single task that owns the periodic timer and performs every
/// flush for one client.
///
/// Ticks, threshold triggers and explicit flushes are all handled in this
/// loop, one at a time, so two sends for the same client never overlap.
/// A tick that comes due while a slow send is in flight is delayed rather
/// than stacked.
pub(crate) fn start(
    flusher: Flusher,
    flush_interval: Duration,
    mut rx: mpsc::Receiver<Command>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + flush_interval, flush_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            interval_ms = u64::try_from(flush_interval.as_millis()).unwrap_or(u64::MAX),
            "log flush worker started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    flusher.flush().await;
                }
                cmd = rx.recv() => {
                    match cmd {
                        Some(Command::Flush(ack)) => {
                            let outcome = flusher.flush().await;
                            if let Some(ack) = ack {
                                let _ = ack.send(outcome);
                            }
                        }
                        Some(Command::Close(ack)) => {
                            let outcome = flusher.flush().await;
                            let _ = ack.send(outcome);
                            break;
                        }
                        None => {
                            flusher.flush().await;
                            break;
                        }
                    }
                }
            }
        }

        debug!("log flush worker stopped");
    })
}
