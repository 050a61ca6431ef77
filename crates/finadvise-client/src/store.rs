//! Dashboard store
//!
//! Single owner of the client-side roster and every per-topic reducer.
//! [`DashboardStore::apply`] dispatches one event under one write lock, so a
//! reader never observes a half-applied update.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use finadvise_types::{
    Agent, AgentStatus, AgentStatusUpdate, CampaignUpdate, LogEntry, LogLevel, Notification,
    ServerEvent, SystemAlert,
};

use crate::config::ReducerCapacities;
use crate::reducers::{
    AlertReducer, CampaignReducer, LogReducer, NotificationReducer, StatusReducer,
};

/// Roster filter; empty fields match everything
#[derive(Debug, Clone, Default)]
pub struct AgentFilter {
    /// Case-insensitive match on name, type or description
    pub search: String,
    pub status: Option<AgentStatus>,
    pub agent_type: Option<String>,
}

impl AgentFilter {
    pub fn matches(&self, agent: &Agent) -> bool {
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || agent.name.to_lowercase().contains(&needle)
            || agent.agent_type.to_lowercase().contains(&needle)
            || agent.description.to_lowercase().contains(&needle);
        let matches_status = self.status.map_or(true, |s| agent.status == s);
        let matches_type = self
            .agent_type
            .as_deref()
            .map_or(true, |t| agent.agent_type == t);

        matches_search && matches_status && matches_type
    }
}

/// Roster aggregates
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSummary {
    pub total: usize,
    pub active: usize,
    pub error: usize,
    pub avg_cpu: f64,
    pub avg_memory: f64,
    pub total_requests: u64,
}

/// Overall status shown by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    Offline,
    Critical,
    Warning,
    Healthy,
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SystemStatus::Offline => "offline",
            SystemStatus::Critical => "critical",
            SystemStatus::Warning => "warning",
            SystemStatus::Healthy => "healthy",
        };
        f.write_str(label)
    }
}

struct StoreInner {
    agents: Vec<Agent>,
    status: StatusReducer,
    logs: LogReducer,
    alerts: AlertReducer,
    campaigns: CampaignReducer,
    notifications: NotificationReducer,
    last_event_at: Option<DateTime<Utc>>,
}

impl StoreInner {
    fn apply_status(&mut self, update: AgentStatusUpdate) {
        if let Some(agent) = self.agents.iter_mut().find(|a| a.id == update.agent_id) {
            agent.apply(&update);
        }
        self.status.apply(update);
    }

    fn system_health(&self) -> f64 {
        if self.agents.is_empty() {
            return 100.0;
        }
        let healthy = self
            .agents
            .iter()
            .filter(|a| a.status != AgentStatus::Error)
            .count();
        healthy as f64 / self.agents.len() as f64 * 100.0
    }
}

/// Client-side state fed by server events
pub struct DashboardStore {
    inner: RwLock<StoreInner>,
}

impl DashboardStore {
    pub fn new(capacities: ReducerCapacities) -> Self {
        Self {
            inner: RwLock::new(StoreInner {
                agents: Vec::new(),
                status: StatusReducer::new(capacities.status),
                logs: LogReducer::new(capacities.logs),
                alerts: AlertReducer::new(capacities.alerts),
                campaigns: CampaignReducer::new(capacities.campaign_events),
                notifications: NotificationReducer::new(capacities.notifications),
                last_event_at: None,
            }),
        }
    }

    /// Fold one server event into the store
    pub fn apply(&self, event: ServerEvent) {
        let mut inner = self.inner.write();
        inner.last_event_at = Some(Utc::now());
        match event {
            ServerEvent::AgentsInitial(agents) => {
                debug!(agents = agents.len(), "Roster replaced");
                inner.agents = agents;
            }
            ServerEvent::AgentStatus(update) | ServerEvent::AgentMetrics(update) => {
                inner.apply_status(update);
            }
            ServerEvent::LogStream(entry) => inner.logs.apply(entry),
            ServerEvent::SystemAlert(alert) => inner.alerts.apply(alert),
            ServerEvent::CampaignUpdate(update) => inner.campaigns.apply(update),
            ServerEvent::NotificationNew(notification) => inner.notifications.apply(notification),
        }
    }

    /// Apply every event received on `rx` until the channel closes
    pub fn follow(self: Arc<Self>, mut rx: broadcast::Receiver<ServerEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => self.apply(event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Store lagging behind event stream");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    pub fn last_event_at(&self) -> Option<DateTime<Utc>> {
        self.inner.read().last_event_at
    }

    // ========================================================================
    // Roster
    // ========================================================================

    pub fn agents(&self) -> Vec<Agent> {
        self.inner.read().agents.clone()
    }

    pub fn agent(&self, id: &str) -> Option<Agent> {
        self.inner.read().agents.iter().find(|a| a.id == id).cloned()
    }

    /// Remove an agent locally; the source is not told
    pub fn remove_agent(&self, id: &str) {
        self.inner.write().agents.retain(|a| a.id != id);
    }

    pub fn filtered_agents(&self, filter: &AgentFilter) -> Vec<Agent> {
        self.inner
            .read()
            .agents
            .iter()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect()
    }

    pub fn agents_by_status(&self, status: AgentStatus) -> Vec<Agent> {
        self.inner
            .read()
            .agents
            .iter()
            .filter(|a| a.status == status)
            .cloned()
            .collect()
    }

    pub fn agent_summary(&self) -> AgentSummary {
        let inner = self.inner.read();
        let agents = &inner.agents;
        if agents.is_empty() {
            return AgentSummary {
                total: 0,
                active: 0,
                error: 0,
                avg_cpu: 0.0,
                avg_memory: 0.0,
                total_requests: 0,
            };
        }

        let count = agents.len() as f64;
        AgentSummary {
            total: agents.len(),
            active: agents.iter().filter(|a| a.status == AgentStatus::Active).count(),
            error: agents.iter().filter(|a| a.status == AgentStatus::Error).count(),
            avg_cpu: agents.iter().map(|a| a.metrics.cpu).sum::<f64>() / count,
            avg_memory: agents.iter().map(|a| a.metrics.memory).sum::<f64>() / count,
            total_requests: agents.iter().map(|a| a.metrics.total_requests).sum(),
        }
    }

    /// Percentage of agents not in `error`
    pub fn system_health(&self) -> f64 {
        self.inner.read().system_health()
    }

    pub fn system_status(&self, online: bool) -> SystemStatus {
        if !online {
            return SystemStatus::Offline;
        }
        let inner = self.inner.read();
        let health = inner.system_health();
        if inner.alerts.critical_count() > 0 || health < 50.0 {
            SystemStatus::Critical
        } else if health < 80.0 {
            SystemStatus::Warning
        } else {
            SystemStatus::Healthy
        }
    }

    // ========================================================================
    // Status stream
    // ========================================================================

    pub fn latest_status(&self, agent_id: &str) -> Option<AgentStatusUpdate> {
        self.inner.read().status.get(agent_id).cloned()
    }

    /// Most recently updated first
    pub fn status_updates(&self) -> Vec<AgentStatusUpdate> {
        self.inner.read().status.latest().into_iter().cloned().collect()
    }

    // ========================================================================
    // Logs
    // ========================================================================

    pub fn logs(&self) -> Vec<LogEntry> {
        self.inner.read().logs.entries().to_vec()
    }

    pub fn logs_by_level(&self, level: LogLevel) -> Vec<LogEntry> {
        self.inner.read().logs.by_level(level).into_iter().cloned().collect()
    }

    /// Streamed lines of one agent
    pub fn agent_logs(&self, agent_id: &str) -> Vec<LogEntry> {
        let inner = self.inner.read();
        let Some(agent) = inner.agents.iter().find(|a| a.id == agent_id) else {
            return Vec::new();
        };
        inner.logs.by_source(&agent.name).into_iter().cloned().collect()
    }

    pub fn clear_logs(&self) {
        self.inner.write().logs.clear();
    }

    // ========================================================================
    // Alerts
    // ========================================================================

    pub fn alerts(&self) -> Vec<SystemAlert> {
        self.inner.read().alerts.alerts().to_vec()
    }

    pub fn acknowledge_alert(&self, id: &str) {
        self.inner.write().alerts.acknowledge(id);
    }

    pub fn dismiss_alert(&self, id: &str) {
        self.inner.write().alerts.dismiss(id);
    }

    pub fn clear_alerts(&self) {
        self.inner.write().alerts.clear_all();
    }

    pub fn unread_alerts(&self) -> usize {
        self.inner.read().alerts.unread_count()
    }

    pub fn critical_alerts(&self) -> usize {
        self.inner.read().alerts.critical_count()
    }

    // ========================================================================
    // Campaign events
    // ========================================================================

    pub fn campaign_events(&self) -> Vec<CampaignUpdate> {
        self.inner.read().campaigns.events().to_vec()
    }

    pub fn clear_campaign_events(&self) {
        self.inner.write().campaigns.clear();
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub fn notifications(&self) -> Vec<Notification> {
        self.inner.read().notifications.notifications().to_vec()
    }

    pub fn mark_notification_read(&self, id: &str) {
        self.inner.write().notifications.mark_as_read(id);
    }

    pub fn unread_notifications(&self) -> usize {
        self.inner.read().notifications.unread_count()
    }

    pub fn clear_notifications(&self) {
        self.inner.write().notifications.clear();
    }
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new(ReducerCapacities::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finadvise_types::{AgentMetrics, AlertKind, AlertSeverity};

    fn agent(id: &str, name: &str, agent_type: &str, status: AgentStatus, cpu: f64) -> Agent {
        let mut metrics = AgentMetrics::idle();
        metrics.cpu = cpu;
        metrics.memory = cpu / 2.0;
        metrics.total_requests = 100;
        Agent {
            id: id.to_string(),
            name: name.to_string(),
            agent_type: agent_type.to_string(),
            status,
            version: "1.0.0".to_string(),
            description: format!("{} description", name),
            metrics,
        }
    }

    fn roster() -> Vec<Agent> {
        vec![
            agent("agent-1", "Content Generator", "content_generator", AgentStatus::Active, 40.0),
            agent("agent-2", "Brand Customizer", "brand_customizer", AgentStatus::Idle, 20.0),
            agent("agent-3", "Analytics Tracker", "analytics_tracker", AgentStatus::Error, 0.0),
            agent("agent-4", "Quality Scorer", "quality_scorer", AgentStatus::Active, 60.0),
        ]
    }

    fn critical_alert(id: &str) -> SystemAlert {
        SystemAlert {
            id: id.to_string(),
            kind: AlertKind::Error,
            severity: AlertSeverity::Critical,
            title: "Agent Communication Error".to_string(),
            message: "Quality Scorer requires attention - agent communication error".to_string(),
            source: "agent-4".to_string(),
            timestamp: Utc::now(),
            acknowledged: false,
        }
    }

    fn seeded_store() -> DashboardStore {
        let store = DashboardStore::default();
        store.apply(ServerEvent::AgentsInitial(roster()));
        store
    }

    #[test]
    fn test_initial_roster_then_status_reconcile() {
        let store = seeded_store();
        assert_eq!(store.agents().len(), 4);

        let mut update = store.agent("agent-2").unwrap().status_update();
        update.status = AgentStatus::Stopped;
        store.apply(ServerEvent::AgentStatus(update));

        assert_eq!(store.agent("agent-2").unwrap().status, AgentStatus::Stopped);
        assert_eq!(store.latest_status("agent-2").unwrap().status, AgentStatus::Stopped);
    }

    #[test]
    fn test_metrics_topic_is_accepted() {
        let store = seeded_store();
        let mut update = store.agent("agent-1").unwrap().status_update();
        update.metrics.cpu = 77.0;
        store.apply(ServerEvent::AgentMetrics(update));
        assert_eq!(store.agent("agent-1").unwrap().metrics.cpu, 77.0);
    }

    #[test]
    fn test_filters() {
        let store = seeded_store();
        let by_search = store.filtered_agents(&AgentFilter {
            search: "BRAND".to_string(),
            ..Default::default()
        });
        assert_eq!(by_search.len(), 1);
        assert_eq!(by_search[0].id, "agent-2");

        let by_status = store.filtered_agents(&AgentFilter {
            status: Some(AgentStatus::Active),
            ..Default::default()
        });
        assert_eq!(by_status.len(), 2);

        let by_type = store.filtered_agents(&AgentFilter {
            agent_type: Some("quality_scorer".to_string()),
            ..Default::default()
        });
        assert_eq!(by_type.len(), 1);

        assert_eq!(store.agents_by_status(AgentStatus::Error).len(), 1);
        assert_eq!(store.filtered_agents(&AgentFilter::default()).len(), 4);
    }

    #[test]
    fn test_summary() {
        let store = seeded_store();
        let summary = store.agent_summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.active, 2);
        assert_eq!(summary.error, 1);
        assert_eq!(summary.avg_cpu, 30.0);
        assert_eq!(summary.avg_memory, 15.0);
        assert_eq!(summary.total_requests, 400);

        let empty = DashboardStore::default().agent_summary();
        assert_eq!(empty.total, 0);
        assert_eq!(empty.avg_cpu, 0.0);
    }

    #[test]
    fn test_remove_agent_is_local() {
        let store = seeded_store();
        store.remove_agent("agent-3");
        store.remove_agent("agent-3");
        assert_eq!(store.agents().len(), 3);
        assert_eq!(store.system_health(), 100.0);
    }

    #[test]
    fn test_system_status() {
        let store = seeded_store();
        assert_eq!(store.system_status(false), SystemStatus::Offline);
        // 3 of 4 healthy
        assert_eq!(store.system_health(), 75.0);
        assert_eq!(store.system_status(true), SystemStatus::Warning);

        store.remove_agent("agent-3");
        assert_eq!(store.system_status(true), SystemStatus::Healthy);

        store.apply(ServerEvent::SystemAlert(critical_alert("alert-1")));
        assert_eq!(store.system_status(true), SystemStatus::Critical);
        store.acknowledge_alert("alert-1");
        assert_eq!(store.system_status(true), SystemStatus::Healthy);
    }

    #[test]
    fn test_health_below_half_is_critical() {
        let store = DashboardStore::default();
        store.apply(ServerEvent::AgentsInitial(vec![
            agent("a", "A", "t", AgentStatus::Error, 0.0),
            agent("b", "B", "t", AgentStatus::Error, 0.0),
            agent("c", "C", "t", AgentStatus::Active, 0.0),
        ]));
        assert_eq!(store.system_status(true), SystemStatus::Critical);
    }

    #[test]
    fn test_agent_logs_by_name() {
        let store = seeded_store();
        for (n, source) in ["Quality Scorer", "Brand Customizer", "Quality Scorer"].iter().enumerate() {
            store.apply(ServerEvent::LogStream(LogEntry {
                id: format!("log-{}", n),
                timestamp: Utc::now(),
                level: LogLevel::Info,
                source: source.to_string(),
                message: "Content quality check passed".to_string(),
            }));
        }
        assert_eq!(store.agent_logs("agent-4").len(), 2);
        assert!(store.agent_logs("agent-99").is_empty());
        assert_eq!(store.logs().first().unwrap().id, "log-2");
    }
}
