//! Connection manager
//!
//! Keeps one logical connection to the event source. A background task owns
//! the transport, fans inbound events out on a broadcast channel and follows
//! the [`Lifecycle`] policy when the transport fails. State changes are
//! published on a `watch` channel.
//!
//! ```text
//! connect() -> dial -> connected -> (close) -> wait delay -> dial ...
//!                 \-> failed ----------------/        (at most max_attempts)
//! disconnect() / drop -> close transport, cancel pending retry
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use finadvise_types::{ClientEvent, ServerEvent};

use crate::config::ReconnectPolicy;
use crate::error::TransportError;
use crate::lifecycle::{ConnectionSnapshot, Decision, Lifecycle, Session};
use crate::transport::{Connector, Transport, WsConnector};

/// Inbound events buffered per subscriber
const EVENT_CHANNEL_CAPACITY: usize = 1024;

struct Worker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// State shared between the manager and its connection task
struct Shared {
    lifecycle: Mutex<Lifecycle>,
    state_tx: watch::Sender<ConnectionSnapshot>,
    events_tx: broadcast::Sender<ServerEvent>,
}

impl Shared {
    fn update<R>(&self, f: impl FnOnce(&mut Lifecycle) -> R) -> R {
        let mut lifecycle = self.lifecycle.lock();
        let result = f(&mut lifecycle);
        self.state_tx.send_replace(lifecycle.snapshot());
        result
    }
}

/// One logical connection with bounded reconnection
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    shared: Arc<Shared>,
    outbound: Mutex<Option<mpsc::UnboundedSender<ClientEvent>>>,
    worker: Mutex<Option<Worker>>,
}

impl ConnectionManager {
    pub fn new(connector: Arc<dyn Connector>, policy: ReconnectPolicy) -> Self {
        let (state_tx, _) = watch::channel(ConnectionSnapshot::default());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            connector,
            shared: Arc::new(Shared {
                lifecycle: Mutex::new(Lifecycle::new(policy)),
                state_tx,
                events_tx,
            }),
            outbound: Mutex::new(None),
            worker: Mutex::new(None),
        }
    }

    /// Manager over a WebSocket endpoint
    pub fn websocket(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self::new(Arc::new(WsConnector::new(url)), policy)
    }

    /// Current connection state
    pub fn snapshot(&self) -> ConnectionSnapshot {
        self.shared.state_tx.borrow().clone()
    }

    /// Watch connection state changes
    pub fn watch_state(&self) -> watch::Receiver<ConnectionSnapshot> {
        self.shared.state_tx.subscribe()
    }

    /// Receive inbound events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.shared.events_tx.subscribe()
    }

    /// Open the connection
    ///
    /// No-op while connected or connecting. After the retry budget was
    /// exhausted this starts over with a fresh budget. Must be called from
    /// within a tokio runtime.
    pub fn connect(&self) {
        let Some(session) = self.shared.update(|l| l.begin_connect()) else {
            debug!("Connect ignored, already connected or connecting");
            return;
        };
        info!(session, "Connecting to event source");

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_connection(
            self.connector.clone(),
            self.shared.clone(),
            session,
            outbound_rx,
            shutdown_rx,
        ));

        *self.outbound.lock() = Some(outbound_tx);
        let previous = self.worker.lock().replace(Worker {
            shutdown: shutdown_tx,
            handle,
        });
        if let Some(previous) = previous {
            let _ = previous.shutdown.send(());
        }
    }

    /// Close the connection and cancel any pending retry
    pub fn disconnect(&self) {
        self.shared.update(|l| l.on_manual_disconnect());
        self.outbound.lock().take();
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.shutdown.send(());
        }
        info!("Disconnected from event source");
    }

    /// Send a control frame if connected; otherwise drop it with a warning
    pub fn emit(&self, event: ClientEvent) {
        if !self.shared.lifecycle.lock().can_emit() {
            warn!(event = event.name(), "Cannot emit event: not connected");
            return;
        }
        let sent = match self.outbound.lock().as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        };
        if !sent {
            warn!("Cannot emit event: connection task is gone");
        }
    }

    /// Whether a connection task is alive
    pub fn is_running(&self) -> bool {
        self.worker
            .lock()
            .as_ref()
            .map(|w| !w.handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            let _ = worker.shutdown.send(());
        }
    }
}

/// How an open transport stopped
enum Ended {
    Shutdown,
    Failed(TransportError),
}

async fn pump(
    transport: &mut Box<dyn Transport>,
    shared: &Shared,
    outbound_rx: &mut mpsc::UnboundedReceiver<ClientEvent>,
    shutdown_rx: &mut oneshot::Receiver<()>,
) -> Ended {
    loop {
        tokio::select! {
            _ = &mut *shutdown_rx => return Ended::Shutdown,
            Some(event) = outbound_rx.recv() => {
                if let Err(e) = transport.send(&event).await {
                    return Ended::Failed(e);
                }
            }
            incoming = transport.recv() => match incoming {
                Ok(Some(event)) => {
                    let _ = shared.events_tx.send(event);
                }
                Ok(None) => return Ended::Failed(TransportError::Closed),
                Err(e) => return Ended::Failed(e),
            },
        }
    }
}

async fn run_connection(
    connector: Arc<dyn Connector>,
    shared: Arc<Shared>,
    session: Session,
    mut outbound_rx: mpsc::UnboundedReceiver<ClientEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        let dialed = tokio::select! {
            _ = &mut shutdown_rx => {
                debug!(session, "Shutdown during dial");
                return;
            }
            result = connector.connect() => result,
        };

        let decision = match dialed {
            Ok(mut transport) => {
                if !shared.update(|l| l.on_open(session)) {
                    transport.close().await;
                    return;
                }
                info!(session, "Connected to event source");

                match pump(&mut transport, &shared, &mut outbound_rx, &mut shutdown_rx).await {
                    Ended::Shutdown => {
                        transport.close().await;
                        debug!(session, "Connection task stopped");
                        return;
                    }
                    Ended::Failed(error) => {
                        transport.close().await;
                        warn!(session, error = %error, "Connection lost");
                        shared.update(|l| l.on_closed(session, error.to_string()))
                    }
                }
            }
            Err(error) => {
                warn!(session, error = %error, "Connection attempt failed");
                shared.update(|l| l.on_connect_failed(session, error.to_string()))
            }
        };

        match decision {
            Decision::Retry { attempt, delay } => {
                let max_attempts = shared.lifecycle.lock().policy().max_attempts;
                info!(session, attempt, max_attempts, delay_ms = delay.as_millis() as u64, "Reconnecting");
                tokio::select! {
                    _ = &mut shutdown_rx => return,
                    _ = tokio::time::sleep(delay) => {}
                }
                if !shared.update(|l| l.on_retry(session)) {
                    return;
                }
            }
            Decision::GiveUp => {
                warn!(session, "Giving up on event source");
                return;
            }
        }
    }
}
