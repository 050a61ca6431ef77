//! Client errors

use thiserror::Error;

/// Failures of the event transport
///
/// These never surface from `emit`; they drive the reconnect policy and are
/// reported through the connection snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Connection closed by peer")]
    Closed,
}

/// Errors of the HTTP command client
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Client Result type
pub type ClientResult<T> = std::result::Result<T, ClientError>;
