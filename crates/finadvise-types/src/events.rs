//! Real-time events
//!
//! Every event travels as one WebSocket text frame holding a JSON envelope
//! `{"event": <topic>, "data": <payload>}`. Ordering is only meaningful
//! within a single topic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::agent::{Agent, AgentStatusUpdate};
use crate::error::{TypesError, TypesResult};

// ============================================================================
// Payloads
// ============================================================================

/// Log severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(TypesError::UnknownLogLevel(other.to_string())),
        }
    }
}

/// One log line attributed to an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Display name of the emitting agent
    pub source: String,
    pub message: String,
}

/// Alert category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Error,
    Warning,
    Info,
}

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl AlertSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::High => "high",
            AlertSeverity::Medium => "medium",
            AlertSeverity::Low => "low",
        }
    }
}

/// A system alert raised against an agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemAlert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    /// Id of the agent the alert concerns
    pub source: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub acknowledged: bool,
}

/// A campaign pipeline event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignUpdate {
    pub id: String,
    /// Always `campaign_update` for events produced by the source
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Kind tag carried by campaign events
pub const CAMPAIGN_UPDATE_KIND: &str = "campaign_update";

/// A user-facing notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

// ============================================================================
// Topics
// ============================================================================

/// Named channel of the publish/subscribe stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    AgentsInitial,
    AgentStatus,
    AgentMetrics,
    LogStream,
    SystemAlert,
    CampaignUpdate,
    NotificationNew,
}

impl Topic {
    pub const ALL: [Topic; 7] = [
        Topic::AgentsInitial,
        Topic::AgentStatus,
        Topic::AgentMetrics,
        Topic::LogStream,
        Topic::SystemAlert,
        Topic::CampaignUpdate,
        Topic::NotificationNew,
    ];

    /// Wire name of the topic
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::AgentsInitial => "agents:initial",
            Topic::AgentStatus => "agent:status",
            Topic::AgentMetrics => "agent:metrics",
            Topic::LogStream => "log:stream",
            Topic::SystemAlert => "system:alert",
            Topic::CampaignUpdate => "campaign:update",
            Topic::NotificationNew => "notification:new",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|topic| topic.as_str() == s)
            .ok_or_else(|| TypesError::UnknownTopic(s.to_string()))
    }
}

// ============================================================================
// Envelopes
// ============================================================================

/// Server-to-client event, one variant per topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full roster, sent once per connection
    #[serde(rename = "agents:initial")]
    AgentsInitial(Vec<Agent>),

    #[serde(rename = "agent:status")]
    AgentStatus(AgentStatusUpdate),

    /// Same payload as `agent:status`; never produced by the demo source
    #[serde(rename = "agent:metrics")]
    AgentMetrics(AgentStatusUpdate),

    #[serde(rename = "log:stream")]
    LogStream(LogEntry),

    #[serde(rename = "system:alert")]
    SystemAlert(SystemAlert),

    #[serde(rename = "campaign:update")]
    CampaignUpdate(CampaignUpdate),

    #[serde(rename = "notification:new")]
    NotificationNew(Notification),
}

impl ServerEvent {
    /// Topic this event is published on
    pub fn topic(&self) -> Topic {
        match self {
            ServerEvent::AgentsInitial(_) => Topic::AgentsInitial,
            ServerEvent::AgentStatus(_) => Topic::AgentStatus,
            ServerEvent::AgentMetrics(_) => Topic::AgentMetrics,
            ServerEvent::LogStream(_) => Topic::LogStream,
            ServerEvent::SystemAlert(_) => Topic::SystemAlert,
            ServerEvent::CampaignUpdate(_) => Topic::CampaignUpdate,
            ServerEvent::NotificationNew(_) => Topic::NotificationNew,
        }
    }

    /// Encode as a text frame
    pub fn to_frame(&self) -> TypesResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a text frame
    pub fn from_frame(frame: &str) -> TypesResult<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}

/// Client-to-server control frame
///
/// The demo source logs these and otherwise ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "metrics:subscribe")]
    MetricsSubscribe { metric: String },

    #[serde(rename = "metrics:unsubscribe")]
    MetricsUnsubscribe { metric: String },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::MetricsSubscribe { .. } => "metrics:subscribe",
            ClientEvent::MetricsUnsubscribe { .. } => "metrics:unsubscribe",
        }
    }

    pub fn to_frame(&self) -> TypesResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_frame(frame: &str) -> TypesResult<Self> {
        Ok(serde_json::from_str(frame)?)
    }
}
