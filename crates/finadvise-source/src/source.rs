//! Event source
//!
//! [`EventSource`] owns the roster, the event bus and the RNG. Every mutation
//! and the publish of its delta happen under the roster write lock, so the
//! per-agent event order always equals the mutation order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use parking_lot::{Mutex, RwLock};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use finadvise_types::{
    Agent, AgentStatus, CampaignUpdate, CommandAck, DataPoint, DateRange, LogEntry, LogLevel,
    OverviewMetrics, ServerEvent, StatusResponse, SystemAlert, CAMPAIGN_UPDATE_KIND,
};

use crate::bus::EventBus;
use crate::catalog::{
    alert_message, ALERT_TEMPLATES, CAMPAIGN_EVENT_MESSAGES, HISTORY_LOG_MESSAGES,
    STREAM_LOG_MESSAGES,
};
use crate::config::SimulationConfig;
use crate::error::{SourceError, SourceResult};
use crate::registry::AgentRegistry;
use crate::seed::demo_roster;
use crate::simulation::perturb;

/// Upper bound on synthetic log entries per request
pub const MAX_LOG_LIMIT: usize = 1000;

/// Number of samples in a realtime series
pub const REALTIME_POINTS: usize = 50;

/// The mock event source
///
/// Cheap to clone; clones share the same roster and bus.
#[derive(Clone)]
pub struct EventSource {
    inner: Arc<Inner>,
}

struct Inner {
    registry: RwLock<AgentRegistry>,
    bus: EventBus,
    rng: Mutex<StdRng>,
    config: SimulationConfig,
    sequence: AtomicU64,
}

impl EventSource {
    /// Source over the demo roster
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_agents(demo_roster(), config)
    }

    /// Source over an explicit roster
    pub fn with_agents(agents: Vec<Agent>, config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(agents = agents.len(), "Event source initialized");
        Self {
            inner: Arc::new(Inner {
                registry: RwLock::new(AgentRegistry::new(agents)),
                bus: EventBus::new(config.bus_capacity),
                rng: Mutex::new(rng),
                config,
                sequence: AtomicU64::new(0),
            }),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.inner.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.inner.bus
    }

    /// Subscribe to every event published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.inner.bus.subscribe()
    }

    fn next_id(&self, prefix: &str) -> String {
        let seq = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
        format!("{}-{}-{}", prefix, Utc::now().timestamp_millis(), seq)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Snapshot copy of the roster
    pub fn list_agents(&self) -> Vec<Agent> {
        self.inner.registry.read().snapshot()
    }

    pub fn agent(&self, id: &str) -> SourceResult<Agent> {
        self.inner
            .registry
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::AgentNotFound(id.to_string()))
    }

    pub fn agent_status(&self, id: &str) -> SourceResult<StatusResponse> {
        let agent = self.agent(id)?;
        Ok(StatusResponse {
            status: agent.status,
            metrics: agent.metrics,
        })
    }

    /// The `agents:initial` event for a fresh subscriber
    pub fn initial_event(&self) -> ServerEvent {
        ServerEvent::AgentsInitial(self.list_agents())
    }

    // ========================================================================
    // Commands
    // ========================================================================

    /// Mark an agent active with a fresh random load
    pub fn start_agent(&self, id: &str) -> SourceResult<CommandAck> {
        let mut registry = self.inner.registry.write();
        let record = registry
            .record_mut(id)
            .ok_or_else(|| SourceError::AgentNotFound(id.to_string()))?;
        record.generation += 1;

        let agent = &mut record.agent;
        {
            let mut rng = self.inner.rng.lock();
            agent.metrics.cpu = rng.gen_range(20.0..80.0);
            agent.metrics.memory = rng.gen_range(30.0..80.0);
            agent.metrics.requests_per_second = rng.gen_range(5.0..25.0);
            agent.metrics.error_rate = rng.gen_range(0.0..2.0);
        }
        agent.status = AgentStatus::Active;
        agent.metrics.touch();

        info!(agent_id = %agent.id, name = %agent.name, "Started agent");
        self.inner.bus.publish(ServerEvent::AgentStatus(agent.status_update()));
        Ok(CommandAck::Active)
    }

    /// Mark an agent stopped and zero its load; counters are kept
    pub fn stop_agent(&self, id: &str) -> SourceResult<CommandAck> {
        let mut registry = self.inner.registry.write();
        let record = registry
            .record_mut(id)
            .ok_or_else(|| SourceError::AgentNotFound(id.to_string()))?;
        record.generation += 1;

        let agent = &mut record.agent;
        agent.status = AgentStatus::Stopped;
        agent.metrics.cpu = 0.0;
        agent.metrics.memory = 0.0;
        agent.metrics.requests_per_second = 0.0;
        agent.metrics.error_rate = 0.0;
        agent.metrics.touch();

        info!(agent_id = %agent.id, name = %agent.name, "Stopped agent");
        self.inner.bus.publish(ServerEvent::AgentStatus(agent.status_update()));
        Ok(CommandAck::Stopped)
    }

    /// Put an agent into `processing` and schedule it back to `active`
    ///
    /// Returns immediately. The delayed phase is dropped if another command
    /// reaches the agent first. Must be called from within a tokio runtime.
    pub fn restart_agent(&self, id: &str) -> SourceResult<CommandAck> {
        let generation = {
            let mut registry = self.inner.registry.write();
            let record = registry
                .record_mut(id)
                .ok_or_else(|| SourceError::AgentNotFound(id.to_string()))?;
            record.generation += 1;

            let agent = &mut record.agent;
            agent.status = AgentStatus::Processing;
            agent.metrics.touch();

            info!(agent_id = %agent.id, name = %agent.name, "Restarting agent");
            self.inner.bus.publish(ServerEvent::AgentStatus(agent.status_update()));
            record.generation
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let source = self.clone();
                let id = id.to_string();
                let delay = self.inner.config.restart_delay;
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    source.complete_restart(&id, generation);
                });
            }
            Err(_) => warn!(agent_id = %id, "No runtime available, restart will not complete"),
        }

        Ok(CommandAck::Restarting)
    }

    /// Second phase of a restart; returns whether it was applied
    pub(crate) fn complete_restart(&self, id: &str, generation: u64) -> bool {
        let mut registry = self.inner.registry.write();
        let Some(record) = registry.record_mut(id) else {
            return false;
        };
        if record.generation != generation {
            debug!(agent_id = %id, "Restart superseded by a newer command");
            return false;
        }

        record.uptime_carry = Duration::ZERO;
        let agent = &mut record.agent;
        agent.status = AgentStatus::Active;
        agent.metrics.uptime = 0;
        agent.metrics.touch();

        info!(agent_id = %agent.id, name = %agent.name, "Restarted agent");
        self.inner.bus.publish(ServerEvent::AgentStatus(agent.status_update()));
        true
    }

    // ========================================================================
    // Timer steps
    // ========================================================================

    /// Perturb every running agent and publish its delta
    ///
    /// Returns the number of agents updated.
    pub fn tick_status(&self) -> usize {
        let interval = self.inner.config.status_interval;
        let mut registry = self.inner.registry.write();
        let mut rng = self.inner.rng.lock();
        let mut updated = 0;

        for record in registry.records_mut() {
            if !record.agent.status.is_running() {
                continue;
            }
            perturb(&mut record.agent.metrics, &mut record.uptime_carry, &mut *rng, interval);
            self.inner.bus.publish(ServerEvent::AgentStatus(record.agent.status_update()));
            updated += 1;
        }

        debug!(updated, "Metrics tick");
        updated
    }

    /// Publish one streamed log line from a random agent
    pub fn emit_log(&self) -> Option<LogEntry> {
        let registry = self.inner.registry.read();
        let mut rng = self.inner.rng.lock();
        let agent = registry.nth(rng.gen_range(0..registry.len().max(1)))?;

        let level = if rng.gen_bool(0.5) { LogLevel::Info } else { LogLevel::Warn };
        let entry = LogEntry {
            id: self.next_id("log"),
            timestamp: Utc::now(),
            level,
            source: agent.name.clone(),
            message: STREAM_LOG_MESSAGES[rng.gen_range(0..STREAM_LOG_MESSAGES.len())].to_string(),
        };

        debug!(level = %entry.level, source = %entry.source, message = %entry.message, "Log stream");
        self.inner.bus.publish(ServerEvent::LogStream(entry.clone()));
        Some(entry)
    }

    /// Roll for an alert against a random agent
    pub fn maybe_emit_alert(&self) -> Option<SystemAlert> {
        let registry = self.inner.registry.read();
        let mut rng = self.inner.rng.lock();
        let probability = self.inner.config.alert_probability.clamp(0.0, 1.0);
        if !rng.gen_bool(probability) {
            return None;
        }
        let agent = registry.nth(rng.gen_range(0..registry.len().max(1)))?;
        let template = ALERT_TEMPLATES[rng.gen_range(0..ALERT_TEMPLATES.len())];

        let alert = SystemAlert {
            id: self.next_id("alert"),
            kind: template.kind,
            severity: template.severity,
            title: template.title.to_string(),
            message: alert_message(&agent.name, template.title),
            source: agent.id.clone(),
            timestamp: Utc::now(),
            acknowledged: false,
        };

        info!(
            severity = alert.severity.as_str(),
            title = %alert.title,
            source = %alert.source,
            "System alert"
        );
        self.inner.bus.publish(ServerEvent::SystemAlert(alert.clone()));
        Some(alert)
    }

    /// Publish one campaign pipeline event
    pub fn emit_campaign_update(&self) -> CampaignUpdate {
        let message = {
            let mut rng = self.inner.rng.lock();
            CAMPAIGN_EVENT_MESSAGES[rng.gen_range(0..CAMPAIGN_EVENT_MESSAGES.len())]
        };
        let update = CampaignUpdate {
            id: self.next_id("event"),
            kind: CAMPAIGN_UPDATE_KIND.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };

        debug!(message = %update.message, "Campaign event");
        self.inner.bus.publish(ServerEvent::CampaignUpdate(update.clone()));
        update
    }

    // ========================================================================
    // Synthetic reports
    // ========================================================================

    /// Synthetic log history, most recent first, one entry per minute
    ///
    /// With `agent` set every entry is attributed to that agent.
    pub fn recent_logs(&self, limit: usize, agent: Option<&str>) -> SourceResult<Vec<LogEntry>> {
        let registry = self.inner.registry.read();
        let pinned = match agent {
            Some(id) => Some(
                registry
                    .get(id)
                    .ok_or_else(|| SourceError::AgentNotFound(id.to_string()))?
                    .name
                    .clone(),
            ),
            None => None,
        };
        if registry.is_empty() {
            return Ok(Vec::new());
        }

        let now = Utc::now();
        let mut rng = self.inner.rng.lock();
        let levels = [LogLevel::Info, LogLevel::Warn, LogLevel::Error];

        let logs = (0..limit.min(MAX_LOG_LIMIT))
            .filter_map(|i| {
                let source = match &pinned {
                    Some(name) => name.clone(),
                    None => registry.nth(rng.gen_range(0..registry.len()))?.name.clone(),
                };
                Some(LogEntry {
                    id: format!("log-{}-{}", now.timestamp_millis(), i),
                    timestamp: now - ChronoDuration::minutes(i as i64),
                    level: levels[rng.gen_range(0..levels.len())],
                    source,
                    message: HISTORY_LOG_MESSAGES[rng.gen_range(0..HISTORY_LOG_MESSAGES.len())]
                        .to_string(),
                })
            })
            .collect();
        Ok(logs)
    }

    /// Dashboard overview over the last 24 hours
    pub fn overview(&self) -> OverviewMetrics {
        let registry = self.inner.registry.read();
        let total = registry.len();
        let active_agents = registry
            .agents()
            .filter(|a| a.status == AgentStatus::Active)
            .count();
        let healthy = registry
            .agents()
            .filter(|a| a.status != AgentStatus::Error)
            .count();
        let system_health = if total == 0 {
            100
        } else {
            (healthy as f64 / total as f64 * 100.0).floor() as u32
        };

        let mut rng = self.inner.rng.lock();
        let end = Utc::now();
        OverviewMetrics {
            total_messages: rng.gen_range(40_000..90_000),
            active_agents,
            active_campaigns: 12,
            total_advisors: 234,
            delivery_rate: rng.gen_range(95.0..100.0),
            engagement_rate: rng.gen_range(20.0..30.0),
            system_health,
            period: DateRange {
                start: end - ChronoDuration::hours(24),
                end,
            },
        }
    }

    /// Fifty per-minute samples ending now
    pub fn realtime_series(&self, metric: &str) -> Vec<DataPoint> {
        debug!(metric, "Realtime series requested");
        let now = Utc::now();
        let mut rng = self.inner.rng.lock();
        (0..REALTIME_POINTS)
            .map(|i| DataPoint {
                timestamp: now - ChronoDuration::minutes((REALTIME_POINTS - i) as i64),
                value: rng.gen_range(0.0..100.0) + (i as f64 / 10.0).sin() * 20.0 + 50.0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finadvise_types::AgentMetrics;
    use std::time::Duration;

    fn idle_agent(id: &str) -> Agent {
        Agent {
            id: id.to_string(),
            name: format!("Agent {}", id),
            agent_type: "quality_scorer".to_string(),
            status: AgentStatus::Idle,
            version: "1.0.0".to_string(),
            description: String::new(),
            metrics: AgentMetrics::idle(),
        }
    }

    #[test]
    fn test_unknown_agent_is_not_found() {
        let source = EventSource::new(SimulationConfig::seeded(1));
        let missing = SourceError::AgentNotFound("agent-99".to_string());

        assert_eq!(source.agent_status("agent-99").unwrap_err(), missing);
        assert_eq!(source.start_agent("agent-99").unwrap_err(), missing);
        assert_eq!(source.stop_agent("agent-99").unwrap_err(), missing);
        assert_eq!(source.restart_agent("agent-99").unwrap_err(), missing);
    }

    #[test]
    fn test_start_sets_load_ranges() {
        let source = EventSource::with_agents(vec![idle_agent("a1")], SimulationConfig::seeded(7));
        for _ in 0..50 {
            assert_eq!(source.start_agent("a1").unwrap(), CommandAck::Active);
            let status = source.agent_status("a1").unwrap();
            assert_eq!(status.status, AgentStatus::Active);
            assert!((20.0..80.0).contains(&status.metrics.cpu));
            assert!((30.0..80.0).contains(&status.metrics.memory));
            assert!((5.0..25.0).contains(&status.metrics.requests_per_second));
            assert!((0.0..2.0).contains(&status.metrics.error_rate));
        }
    }

    #[test]
    fn test_stop_zeroes_load_and_keeps_counters() {
        let source = EventSource::new(SimulationConfig::seeded(3));
        let before = source.agent("agent-1").unwrap().metrics;

        assert_eq!(source.stop_agent("agent-1").unwrap(), CommandAck::Stopped);
        let after = source.agent_status("agent-1").unwrap();

        assert_eq!(after.status, AgentStatus::Stopped);
        assert_eq!(after.metrics.cpu, 0.0);
        assert_eq!(after.metrics.memory, 0.0);
        assert_eq!(after.metrics.requests_per_second, 0.0);
        assert_eq!(after.metrics.error_rate, 0.0);
        assert_eq!(after.metrics.total_requests, before.total_requests);
        assert_eq!(after.metrics.total_errors, before.total_errors);
        assert_eq!(after.metrics.uptime, before.uptime);
    }

    #[test]
    fn test_commands_publish_status_events() {
        let source = EventSource::new(SimulationConfig::seeded(3));
        let mut rx = source.subscribe();

        source.stop_agent("agent-2").unwrap();
        match rx.try_recv().unwrap() {
            ServerEvent::AgentStatus(update) => {
                assert_eq!(update.agent_id, "agent-2");
                assert_eq!(update.status, AgentStatus::Stopped);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_tick_only_touches_running_agents() {
        let source = EventSource::new(SimulationConfig::seeded(11));
        let running = source
            .list_agents()
            .iter()
            .filter(|a| a.status.is_running())
            .count();
        let idle_before = source.agent("agent-3").unwrap().metrics;

        assert_eq!(source.tick_status(), running);
        assert_eq!(source.agent("agent-3").unwrap().metrics, idle_before);
    }

    #[test]
    fn test_tick_keeps_invariants() {
        let source = EventSource::new(SimulationConfig::seeded(5));
        let mut previous = source.list_agents();
        for _ in 0..200 {
            source.tick_status();
            let current = source.list_agents();
            for (before, after) in previous.iter().zip(current.iter()) {
                let m = &after.metrics;
                assert!((0.0..=100.0).contains(&m.cpu));
                assert!((0.0..=100.0).contains(&m.memory));
                assert!(m.requests_per_second >= 0.0);
                assert!(m.total_requests >= before.metrics.total_requests);
                assert!(m.total_errors >= before.metrics.total_errors);
            }
            previous = current;
        }
    }

    #[test]
    fn test_sub_second_ticks_accumulate_uptime() {
        let mut config = SimulationConfig::seeded(5);
        config.status_interval = Duration::from_millis(500);
        let source = EventSource::new(config);
        let before = source.agent("agent-1").unwrap().metrics.uptime;

        for _ in 0..4 {
            source.tick_status();
        }
        assert_eq!(source.agent("agent-1").unwrap().metrics.uptime, before + 2);

        source.tick_status();
        assert_eq!(source.agent("agent-1").unwrap().metrics.uptime, before + 2);
    }

    #[test]
    fn test_stale_restart_completion_is_dropped() {
        let source = EventSource::new(SimulationConfig::seeded(9));
        source.restart_agent("agent-5").unwrap();
        source.stop_agent("agent-5").unwrap();

        assert!(!source.complete_restart("agent-5", 1));
        assert_eq!(source.agent("agent-5").unwrap().status, AgentStatus::Stopped);
    }

    #[test]
    fn test_alert_probability_extremes() {
        let mut config = SimulationConfig::seeded(2);
        config.alert_probability = 0.0;
        assert!(EventSource::new(config.clone()).maybe_emit_alert().is_none());

        config.alert_probability = 1.0;
        let alert = EventSource::new(config).maybe_emit_alert().unwrap();
        assert!(alert.message.contains(" requires attention - "));
        assert!(alert.source.starts_with("agent-"));
        assert!(!alert.acknowledged);
    }

    #[test]
    fn test_stream_log_levels() {
        let source = EventSource::new(SimulationConfig::seeded(4));
        for _ in 0..50 {
            let entry = source.emit_log().unwrap();
            assert!(matches!(entry.level, LogLevel::Info | LogLevel::Warn));
            assert!(STREAM_LOG_MESSAGES.contains(&entry.message.as_str()));
        }
    }

    #[test]
    fn test_campaign_update_kind() {
        let source = EventSource::new(SimulationConfig::seeded(4));
        let update = source.emit_campaign_update();
        assert_eq!(update.kind, "campaign_update");
        assert!(update.id.starts_with("event-"));
    }

    #[test]
    fn test_recent_logs_most_recent_first() {
        let source = EventSource::new(SimulationConfig::seeded(6));
        let logs = source.recent_logs(25, None).unwrap();
        assert_eq!(logs.len(), 25);
        assert!(logs.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

        let pinned = source.recent_logs(5, Some("agent-4")).unwrap();
        assert!(pinned.iter().all(|l| l.source == "WhatsApp Message Creator"));
        assert!(source.recent_logs(5, Some("nope")).is_err());
    }

    #[test]
    fn test_overview_health() {
        let source = EventSource::new(SimulationConfig::seeded(8));
        let overview = source.overview();
        assert_eq!(overview.system_health, 90);
        assert_eq!(overview.active_agents, 5);
        assert!((40_000..90_000).contains(&overview.total_messages));
        assert!((95.0..100.0).contains(&overview.delivery_rate));
    }

    #[test]
    fn test_realtime_series_spacing() {
        let source = EventSource::new(SimulationConfig::seeded(8));
        let series = source.realtime_series("cpu");
        assert_eq!(series.len(), REALTIME_POINTS);
        let step = series[1].timestamp - series[0].timestamp;
        assert_eq!(step, ChronoDuration::minutes(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_completes_after_delay() {
        let source = EventSource::new(SimulationConfig::seeded(10));
        assert_eq!(source.restart_agent("agent-1").unwrap(), CommandAck::Restarting);
        assert_eq!(source.agent("agent-1").unwrap().status, AgentStatus::Processing);

        tokio::time::sleep(Duration::from_millis(3100)).await;

        let agent = source.agent("agent-1").unwrap();
        assert_eq!(agent.status, AgentStatus::Active);
        assert_eq!(agent.metrics.uptime, 0);
    }
}
