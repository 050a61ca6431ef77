//! Parsing errors for wire types

use thiserror::Error;

/// Errors raised while decoding wire values
#[derive(Debug, Error)]
pub enum TypesError {
    #[error("Unknown agent status: {0}")]
    UnknownStatus(String),

    #[error("Unknown log level: {0}")]
    UnknownLogLevel(String),

    #[error("Unknown topic: {0}")]
    UnknownTopic(String),

    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] serde_json::Error),
}

/// Result alias for wire decoding
pub type TypesResult<T> = Result<T, TypesError>;
