//! Event bus
//!
//! In-process fan-out of [`ServerEvent`]s to every subscriber. Backed by a
//! bounded tokio broadcast channel: a slow subscriber lags and skips events,
//! publishers never block.

use finadvise_types::ServerEvent;
use tokio::sync::broadcast;
use tracing::trace;

/// Default number of events buffered per subscriber
pub const DEFAULT_BUS_CAPACITY: usize = 1024;

/// Broadcast channel of server events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event, returning how many subscribers will see it
    pub fn publish(&self, event: ServerEvent) -> usize {
        let topic = event.topic();
        match self.tx.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                trace!(%topic, "No subscribers for event");
                0
            }
        }
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.tx.subscribe()
    }

    /// Number of live receivers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}
