//! Event log consumer.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus), writes
//! every event to the structured log and retains the most recent ones for
//! the dashboard activity feed. It stops when the bus is dropped or its
//! [`CancellationToken`] fires.

use std::collections::VecDeque;

use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::bus::PlatformEvent;

/// Default number of events retained in memory.
pub const DEFAULT_RETAINED: usize = 200;

pub struct EventLog {
    retained: usize,
    recent: RwLock<VecDeque<PlatformEvent>>,
}

impl EventLog {
    pub fn new(retained: usize) -> Self {
        Self {
            retained,
            recent: RwLock::new(VecDeque::with_capacity(retained)),
        }
    }

    /// Most recent events, newest first.
    pub async fn recent(&self, limit: usize) -> Vec<PlatformEvent> {
        self.recent
            .read()
            .await
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect()
    }

    async fn record(&self, event: PlatformEvent) {
        tracing::info!(
            event_type = %event.event_type,
            source_type = event.source_entity_type.as_deref().unwrap_or("-"),
            source_id = event.source_entity_id.as_deref().unwrap_or("-"),
            payload = %event.payload,
            "Platform event"
        );

        let mut recent = self.recent.write().await;
        if recent.len() == self.retained {
            recent.pop_front();
        }
        if self.retained > 0 {
            recent.push_back(event);
        }
    }

    /// Run the consumer loop.
    pub async fn run(
        &self,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Event log cancelled");
                    break;
                }
                received = receiver.recv() => match received {
                    Ok(event) => self.record(event).await,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Event log lagged, some events were not recorded");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::info!("Event bus closed, event log shutting down");
                        break;
                    }
                },
            }
        }
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_RETAINED)
    }
}
