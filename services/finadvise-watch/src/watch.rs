//! Live watch mode
//!
//! Follows the event stream into a [`DashboardStore`], printing connection
//! changes, notable events and a periodic summary until Ctrl+C or until the
//! connection gives up.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use finadvise_client::{ClientConfig, ConnectionManager, DashboardStore};
use finadvise_types::{AgentStatus, ServerEvent};

use crate::display;

pub async fn run(config: ClientConfig, summary_every: Duration, show_logs: bool) -> anyhow::Result<()> {
    display::section(&format!("Watching {}", config.ws_url));

    let manager = ConnectionManager::websocket(config.ws_url.clone(), config.reconnect);
    let store = Arc::new(DashboardStore::new(config.capacities));
    let follower = store.clone().follow(manager.subscribe());
    let mut events = manager.subscribe();
    let mut state_rx = manager.watch_state();
    let mut known = HashMap::new();

    manager.connect();

    let mut summary = tokio::time::interval_at(
        tokio::time::Instant::now() + summary_every,
        summary_every,
    );
    summary.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                }
                display::info("Stopping");
                break;
            }
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = state_rx.borrow_and_update().clone();
                display::connection(&snapshot);
            }
            event = events.recv() => match event {
                Ok(event) => print_event(&event, &mut known, show_logs),
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Watcher lagging behind event stream"),
                Err(RecvError::Closed) => break,
            },
            _ = summary.tick() => {
                let snapshot = manager.snapshot();
                display::summary(
                    &store.agent_summary(),
                    store.system_status(snapshot.is_connected()),
                    store.system_health(),
                    store.unread_alerts(),
                );
                if !snapshot.is_connected() && !manager.is_running() {
                    display::error("Event source unreachable, giving up");
                    break;
                }
            }
        }
    }

    manager.disconnect();
    follower.abort();
    Ok(())
}

/// Print one event; status updates only when the status changed
fn print_event(event: &ServerEvent, known: &mut HashMap<String, AgentStatus>, show_logs: bool) {
    match event {
        ServerEvent::AgentsInitial(agents) => {
            display::info(&format!("Received roster of {} agents", agents.len()));
            known.clear();
            for agent in agents {
                known.insert(agent.id.clone(), agent.status);
                display::agent_row(agent);
            }
        }
        ServerEvent::AgentStatus(update) => {
            if known.insert(update.agent_id.clone(), update.status) != Some(update.status) {
                display::info(&format!(
                    "{} is now {}",
                    update.agent_id,
                    display::status_label(update.status)
                ));
            }
        }
        ServerEvent::AgentMetrics(update) => {
            debug!(agent_id = %update.agent_id, cpu = update.metrics.cpu, "Metrics update");
        }
        ServerEvent::LogStream(entry) => {
            if show_logs {
                display::log_line(entry);
            }
        }
        ServerEvent::SystemAlert(alert) => display::alert_line(alert),
        ServerEvent::CampaignUpdate(update) => display::info(&update.message),
        ServerEvent::NotificationNew(notification) => {
            display::info(&format!("{}: {}", notification.title, notification.message));
        }
    }
}
