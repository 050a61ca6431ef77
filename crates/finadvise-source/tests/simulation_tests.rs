//! Event source scenarios driven through the public API

use std::time::Duration;

use finadvise_source::{EventSource, SimulationConfig};
use finadvise_types::{Agent, AgentMetrics, AgentStatus, CommandAck, ServerEvent, Topic};
use tokio::sync::broadcast;

fn single_idle_agent() -> Vec<Agent> {
    vec![Agent {
        id: "a1".to_string(),
        name: "Solo".to_string(),
        agent_type: "content_generator".to_string(),
        status: AgentStatus::Idle,
        version: "0.1.0".to_string(),
        description: "Single agent roster".to_string(),
        metrics: AgentMetrics::idle(),
    }]
}

fn expect_status(rx: &mut broadcast::Receiver<ServerEvent>) -> finadvise_types::AgentStatusUpdate {
    match rx.try_recv().expect("an event should be queued") {
        ServerEvent::AgentStatus(update) => update,
        other => panic!("expected agent:status, got {:?}", other),
    }
}

#[test]
fn start_then_tick_emits_bounded_deltas() {
    let source = EventSource::with_agents(single_idle_agent(), SimulationConfig::seeded(21));
    let mut rx = source.subscribe();

    source.start_agent("a1").unwrap();
    let started = expect_status(&mut rx);
    assert_eq!(started.status, AgentStatus::Active);
    assert!((20.0..=80.0).contains(&started.metrics.cpu));

    assert_eq!(source.tick_status(), 1);
    let ticked = expect_status(&mut rx);
    assert!((ticked.metrics.cpu - started.metrics.cpu).abs() <= 5.0);
    assert!((0.0..=100.0).contains(&ticked.metrics.cpu));
    assert!(ticked.metrics.total_requests >= started.metrics.total_requests);
}

#[test]
fn idle_roster_produces_no_ticks() {
    let source = EventSource::with_agents(single_idle_agent(), SimulationConfig::seeded(21));
    let mut rx = source.subscribe();

    assert_eq!(source.tick_status(), 0);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn stop_during_pending_restart_stays_stopped() {
    let source = EventSource::new(SimulationConfig::seeded(3));
    let mut rx = source.subscribe();

    assert_eq!(source.restart_agent("agent-2").unwrap(), CommandAck::Restarting);
    assert_eq!(expect_status(&mut rx).status, AgentStatus::Processing);

    tokio::time::sleep(Duration::from_secs(1)).await;
    source.stop_agent("agent-2").unwrap();
    assert_eq!(expect_status(&mut rx).status, AgentStatus::Stopped);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(source.agent("agent-2").unwrap().status, AgentStatus::Stopped);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn second_restart_supersedes_first() {
    let source = EventSource::new(SimulationConfig::seeded(3));
    let mut rx = source.subscribe();

    source.restart_agent("agent-3").unwrap();
    tokio::time::sleep(Duration::from_secs(2)).await;
    source.restart_agent("agent-3").unwrap();
    expect_status(&mut rx);
    expect_status(&mut rx);

    // First restart would have landed here
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(source.agent("agent-3").unwrap().status, AgentStatus::Processing);

    tokio::time::sleep(Duration::from_secs(2)).await;
    let agent = source.agent("agent-3").unwrap();
    assert_eq!(agent.status, AgentStatus::Active);
    assert_eq!(agent.metrics.uptime, 0);
    assert_eq!(expect_status(&mut rx).status, AgentStatus::Active);
}

#[tokio::test(start_paused = true)]
async fn simulation_timers_publish_every_topic() {
    let mut config = SimulationConfig::seeded(17);
    config.alert_probability = 1.0;
    let source = EventSource::new(config);
    let mut rx = source.subscribe();
    let handle = source.spawn_simulation();

    tokio::time::sleep(Duration::from_millis(15_500)).await;

    let mut seen = Vec::new();
    while let Ok(event) = rx.try_recv() {
        seen.push(event.topic());
    }
    assert!(seen.contains(&Topic::AgentStatus));
    assert!(seen.contains(&Topic::LogStream));
    assert!(seen.contains(&Topic::CampaignUpdate));
    assert!(seen.contains(&Topic::SystemAlert));

    handle.shutdown();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn no_events_before_first_period() {
    let source = EventSource::new(SimulationConfig::seeded(17));
    let mut rx = source.subscribe();
    let _handle = source.spawn_simulation();

    tokio::time::sleep(Duration::from_millis(1900)).await;
    assert!(rx.try_recv().is_err());
}
