//! Event source errors

use thiserror::Error;

/// Errors returned by roster operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("Agent not found: {0}")]
    AgentNotFound(String),
}

/// Result alias for roster operations
pub type SourceResult<T> = Result<T, SourceError>;
