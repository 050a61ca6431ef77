//! Application state shared across handlers

use std::time::Duration;

use chrono::{DateTime, Utc};
use finadvise_source::EventSource;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The event source backing every endpoint
    pub source: EventSource,
    /// When the router was built
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(source: EventSource) -> Self {
        Self {
            source,
            started_at: Utc::now(),
        }
    }

    /// Time since the state was created; zero if the clock moved backwards
    pub fn uptime(&self) -> Duration {
        (Utc::now() - self.started_at).to_std().unwrap_or_default()
    }
}
