//! Event transport
//!
//! [`Connector`] dials, [`Transport`] carries typed frames. The WebSocket
//! implementation speaks the `{"event", "data"}` envelope over
//! tokio-tungstenite; tests plug in an in-memory pair instead.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use finadvise_types::{ClientEvent, ServerEvent};

use crate::error::TransportError;

/// One live bidirectional connection
#[async_trait]
pub trait Transport: Send {
    /// Send a control frame
    async fn send(&mut self, event: &ClientEvent) -> Result<(), TransportError>;

    /// Next server event; `Ok(None)` once the peer closed
    ///
    /// Must be cancel safe: it is raced against outbound frames and shutdown.
    async fn recv(&mut self) -> Result<Option<ServerEvent>, TransportError>;

    /// Close the connection, best effort
    async fn close(&mut self);
}

/// Opens transports
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn Transport>, TransportError>;
}

// ============================================================================
// WebSocket
// ============================================================================

/// Dials a WebSocket endpoint
#[derive(Debug, Clone)]
pub struct WsConnector {
    url: String,
}

impl WsConnector {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self) -> Result<Box<dyn Transport>, TransportError> {
        debug!(url = %self.url, "Dialing event stream");
        let (stream, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;
        Ok(Box::new(WsTransport { stream }))
    }
}

/// WebSocket carrying JSON envelopes
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, event: &ClientEvent) -> Result<(), TransportError> {
        let frame = event
            .to_frame()
            .map_err(|e| TransportError::Protocol(e.to_string()))?;
        self.stream
            .send(Message::Text(frame))
            .await
            .map_err(|e| TransportError::Protocol(e.to_string()))
    }

    async fn recv(&mut self) -> Result<Option<ServerEvent>, TransportError> {
        while let Some(message) = self.stream.next().await {
            match message.map_err(|e| TransportError::Protocol(e.to_string()))? {
                Message::Text(text) => match ServerEvent::from_frame(&text) {
                    Ok(event) => return Ok(Some(event)),
                    Err(e) => warn!(error = %e, "Dropping undecodable frame"),
                },
                Message::Close(_) => return Ok(None),
                _ => {}
            }
        }
        Ok(None)
    }

    async fn close(&mut self) {
        if let Err(e) = self.stream.close(None).await {
            debug!(error = %e, "Close handshake failed");
        }
    }
}
