//! Scripted in-memory transport for unit tests.

use crate::error::TransportError;
use crate::record::{LogEntry, SourceInfo};
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub enum ShipBehavior {
    Accept,
    Reject,
    Hang,
}

pub struct ScriptedTransport {
    source: Option<SourceInfo>,
    validate_delay: Duration,
    script: Mutex<VecDeque<ShipBehavior>>,
    fallback: ShipBehavior,
    pub validate_calls: AtomicUsize,
    pub ship_calls: AtomicUsize,
    pub delivered: Mutex<Vec<Vec<LogEntry>>>,
}

impl ScriptedTransport {
    pub fn accepting() -> Self {
        Self::with_fallback(ShipBehavior::Accept)
    }

    pub fn with_fallback(fallback: ShipBehavior) -> Self {
        Self {
            source: None,
            validate_delay: Duration::ZERO,
            script: Mutex::new(VecDeque::new()),
            fallback,
            validate_calls: AtomicUsize::new(0),
            ship_calls: AtomicUsize::new(0),
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn with_source(mut self, info: SourceInfo) -> Self {
        self.source = Some(info);
        self
    }

    pub fn with_validate_delay(mut self, delay: Duration) -> Self {
        self.validate_delay = delay;
        self
    }

    /// Behaviors consumed by successive `ship` calls before the fallback applies.
    pub fn then(self, behavior: ShipBehavior) -> Self {
        self.script.lock().unwrap().push_back(behavior);
        self
    }

    pub fn validate_count(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn ship_count(&self) -> usize {
        self.ship_calls.load(Ordering::SeqCst)
    }

    pub fn delivered_messages(&self) -> Vec<Vec<String>> {
        self.delivered
            .lock()
            .unwrap()
            .iter()
            .map(|batch| batch.iter().map(|e| e.message.clone()).collect())
            .collect()
    }
}

pub fn sample_source() -> SourceInfo {
    SourceInfo {
        id: "src-1".into(),
        name: "checkout".into(),
        user_id: "user-1".into(),
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn validate(&self) -> Result<SourceInfo, TransportError> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if !self.validate_delay.is_zero() {
            tokio::time::sleep(self.validate_delay).await;
        }
        self.source.clone().ok_or(TransportError::Status {
            status: 401,
            body: "invalid api key".into(),
        })
    }

    async fn ship(&self, batch: &[LogEntry]) -> Result<(), TransportError> {
        self.ship_calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        match behavior {
            ShipBehavior::Accept => {
                self.delivered.lock().unwrap().push(batch.to_vec());
                Ok(())
            }
            ShipBehavior::Reject => Err(TransportError::Status {
                status: 503,
                body: "unavailable".into(),
            }),
            ShipBehavior::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}
