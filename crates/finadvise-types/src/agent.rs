//! Agent entities
//!
//! An agent is a named worker in the content pipeline (content generation,
//! distribution, compliance, ...). The roster is fixed; agents are mutated in
//! place by the simulation and by operator commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

// ============================================================================
// Status
// ============================================================================

/// Operational status of an agent
///
/// A plain label: any status may follow any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    Active,
    Idle,
    Processing,
    Error,
    Maintenance,
    Stopped,
}

impl AgentStatus {
    /// All statuses, in display order
    pub const ALL: [AgentStatus; 6] = [
        AgentStatus::Active,
        AgentStatus::Idle,
        AgentStatus::Processing,
        AgentStatus::Error,
        AgentStatus::Maintenance,
        AgentStatus::Stopped,
    ];

    /// Whether the simulation perturbs agents in this status
    pub fn is_running(&self) -> bool {
        matches!(self, AgentStatus::Active | AgentStatus::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStatus::Active => "active",
            AgentStatus::Idle => "idle",
            AgentStatus::Processing => "processing",
            AgentStatus::Error => "error",
            AgentStatus::Maintenance => "maintenance",
            AgentStatus::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypesError::UnknownStatus(s.to_string()))
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// Live performance figures of one agent
///
/// `cpu`, `memory` and `error_rate` are percentages in [0, 100]; the
/// cumulative counters only ever grow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetrics {
    pub cpu: f64,
    pub memory: f64,
    pub requests_per_second: f64,
    pub error_rate: f64,
    /// Average response time in milliseconds
    pub avg_response_time: f64,
    /// Seconds since the last (re)start
    pub uptime: u64,
    pub total_requests: u64,
    pub total_errors: u64,
    pub last_update: DateTime<Utc>,
}

impl AgentMetrics {
    /// Metrics of an agent that is not doing any work
    pub fn idle() -> Self {
        Self {
            cpu: 0.0,
            memory: 0.0,
            requests_per_second: 0.0,
            error_rate: 0.0,
            avg_response_time: 0.0,
            uptime: 0,
            total_requests: 0,
            total_errors: 0,
            last_update: Utc::now(),
        }
    }

    /// Clamp the bounded figures back into their legal ranges
    pub fn clamp(&mut self) {
        self.cpu = clamp_percent(self.cpu);
        self.memory = clamp_percent(self.memory);
        self.error_rate = clamp_percent(self.error_rate);
        self.requests_per_second = self.requests_per_second.max(0.0);
        self.avg_response_time = self.avg_response_time.max(0.0);
    }

    /// Mark the metrics as freshly written
    pub fn touch(&mut self) {
        self.last_update = Utc::now();
    }
}

/// Clamp a percentage into [0, 100]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

// ============================================================================
// Agent
// ============================================================================

/// A full agent snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
    /// Role tag, e.g. `content_generator`
    #[serde(rename = "type")]
    pub agent_type: String,
    pub status: AgentStatus,
    pub version: String,
    pub description: String,
    pub metrics: AgentMetrics,
}

impl Agent {
    /// Status delta for this agent
    pub fn status_update(&self) -> AgentStatusUpdate {
        AgentStatusUpdate {
            agent_id: self.id.clone(),
            status: self.status,
            metrics: self.metrics.clone(),
        }
    }

    /// Apply a status delta in place
    pub fn apply(&mut self, update: &AgentStatusUpdate) {
        self.status = update.status;
        self.metrics = update.metrics.clone();
    }
}

/// Status delta carried by `agent:status` and `agent:metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStatusUpdate {
    pub agent_id: String,
    pub status: AgentStatus,
    pub metrics: AgentMetrics,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in AgentStatus::ALL {
            assert_eq!(status.as_str().parse::<AgentStatus>().unwrap(), status);
        }
        assert!("sleeping".parse::<AgentStatus>().is_err());
    }

    #[test]
    fn test_running_statuses() {
        assert!(AgentStatus::Active.is_running());
        assert!(AgentStatus::Processing.is_running());
        assert!(!AgentStatus::Idle.is_running());
        assert!(!AgentStatus::Stopped.is_running());
        assert!(!AgentStatus::Error.is_running());
    }

    #[test]
    fn test_clamp_keeps_bounds() {
        let mut metrics = AgentMetrics::idle();
        metrics.cpu = 104.2;
        metrics.memory = -3.0;
        metrics.requests_per_second = -1.5;
        metrics.error_rate = f64::NAN;
        metrics.clamp();

        assert_eq!(metrics.cpu, 100.0);
        assert_eq!(metrics.memory, 0.0);
        assert_eq!(metrics.requests_per_second, 0.0);
        assert_eq!(metrics.error_rate, 0.0);
    }

    #[test]
    fn test_agent_wire_shape() {
        let agent = Agent {
            id: "agent-1".to_string(),
            name: "Content Generator".to_string(),
            agent_type: "content_generator".to_string(),
            status: AgentStatus::Active,
            version: "2.1.4".to_string(),
            description: "Generates personalized financial content".to_string(),
            metrics: AgentMetrics::idle(),
        };

        let json = serde_json::to_value(&agent).unwrap();
        assert_eq!(json["type"], "content_generator");
        assert_eq!(json["status"], "active");
        assert!(json["metrics"].get("requestsPerSecond").is_some());
        assert!(json["metrics"].get("lastUpdate").is_some());
    }

    #[test]
    fn test_apply_status_update() {
        let mut agent = Agent {
            id: "a1".to_string(),
            name: "A".to_string(),
            agent_type: "quality_scorer".to_string(),
            status: AgentStatus::Idle,
            version: "1.0.0".to_string(),
            description: String::new(),
            metrics: AgentMetrics::idle(),
        };
        let mut update = agent.status_update();
        update.status = AgentStatus::Active;
        update.metrics.cpu = 42.0;

        agent.apply(&update);
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.metrics.cpu, 42.0);
    }
}
