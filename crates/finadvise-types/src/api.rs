//! HTTP request and response bodies
//!
//! Shared by the server router and the command client so both sides agree on
//! the JSON shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{AgentMetrics, AgentStatus};

/// `GET /api/health`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    /// Whole seconds since the server started
    #[serde(default)]
    pub uptime_seconds: u64,
}

/// `GET /api/agents/:id/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: AgentStatus,
    pub metrics: AgentMetrics,
}

/// Status reported back by a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandAck {
    Active,
    Stopped,
    /// The restart was accepted; completion arrives as an event
    Restarting,
}

/// `POST /api/agents/:id/{start,stop,restart}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub success: bool,
    pub status: CommandAck,
}

impl CommandResponse {
    pub fn ok(status: CommandAck) -> Self {
        Self { success: true, status }
    }
}

/// Error body returned with non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Query string of the log endpoints
///
/// `limit` stays raw text; the server reads it leniently instead of rejecting
/// values that are not a plain number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<String>,
}

/// Default number of entries returned by the log endpoints
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Time window covered by an analytics report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// `GET /api/analytics/overview`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewMetrics {
    pub total_messages: u64,
    pub active_agents: usize,
    pub active_campaigns: u32,
    pub total_advisors: u32,
    pub delivery_rate: f64,
    pub engagement_rate: f64,
    /// Percentage of agents not in `error`, floored
    pub system_health: u32,
    pub period: DateRange,
}

/// One sample of a realtime series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Scheduled,
    Paused,
    Completed,
}

/// `GET /api/campaigns`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub status: CampaignStatus,
    pub advisors: u32,
    pub messages: u64,
    pub engagement: f64,
}

/// `GET /api/advisors`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisor {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub segment: String,
    pub engagement: f64,
    pub last_active: DateTime<Utc>,
}
