//! Client configuration

use std::time::Duration;

/// Environment variable holding the event stream URL
pub const WEBSOCKET_URL_ENV: &str = "FINADVISE_WEBSOCKET_URL";
/// Environment variable holding the HTTP API base URL
pub const API_URL_ENV: &str = "FINADVISE_API_URL";

pub const DEFAULT_WEBSOCKET_URL: &str = "ws://localhost:3001/ws";
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Reconnect behaviour after an unexpected close or failed handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive attempts before giving up
    pub max_attempts: u32,
    /// Fixed wait before each attempt
    pub delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(3),
        }
    }
}

/// Per-topic retention limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReducerCapacities {
    /// Distinct agents tracked by the status reducer
    pub status: usize,
    pub logs: usize,
    pub alerts: usize,
    pub campaign_events: usize,
    pub notifications: usize,
}

impl Default for ReducerCapacities {
    fn default() -> Self {
        Self {
            status: 100,
            logs: 1000,
            alerts: 50,
            campaign_events: 100,
            notifications: 20,
        }
    }
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Event stream endpoint
    pub ws_url: String,
    /// HTTP API base, including the `/api` prefix
    pub api_url: String,
    pub reconnect: ReconnectPolicy,
    /// HTTP request timeout
    pub request_timeout: Duration,
    pub capacities: ReducerCapacities,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ws_url: DEFAULT_WEBSOCKET_URL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            reconnect: ReconnectPolicy::default(),
            request_timeout: Duration::from_secs(30),
            capacities: ReducerCapacities::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults with endpoint overrides from the environment
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = non_empty_env(WEBSOCKET_URL_ENV) {
            config.ws_url = url;
        }
        if let Some(url) = non_empty_env(API_URL_ENV) {
            config.api_url = url;
        }
        config
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectPolicy) -> Self {
        self.reconnect = reconnect;
        self
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.ws_url, "ws://localhost:3001/ws");
        assert_eq!(config.api_url, "http://localhost:3001/api");
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.reconnect.delay, Duration::from_secs(3));
        assert_eq!(config.capacities.logs, 1000);
        assert_eq!(config.capacities.notifications, 20);
    }

    #[test]
    fn test_builders() {
        let config = ClientConfig::default()
            .with_ws_url("ws://demo:9000/ws")
            .with_api_url("http://demo:9000/api");
        assert_eq!(config.ws_url, "ws://demo:9000/ws");
        assert_eq!(config.api_url, "http://demo:9000/api");
    }
}
