//! Simulation timers
//!
//! Four independent loops drive the source: metrics, log stream, alert roll
//! and campaign events. They are owned by a [`SimulationHandle`] which aborts
//! them on shutdown or drop.

use std::time::Duration;

use finadvise_types::AgentMetrics;
use rand::Rng;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::source::EventSource;

/// Maximum cpu drift per tick, in percentage points
pub const CPU_DRIFT: f64 = 5.0;
/// Maximum memory drift per tick, in percentage points
pub const MEMORY_DRIFT: f64 = 4.0;
/// Maximum throughput drift per tick, in requests per second
pub const THROUGHPUT_DRIFT: f64 = 2.5;

/// Random-walk one agent's metrics over `interval`
///
/// Percentages stay in [0, 100], throughput stays non-negative and the
/// cumulative counters only grow. `uptime_carry` holds the sub-second part of
/// the running time between calls, so periods that are not whole seconds
/// still add up.
pub fn perturb<R: Rng + ?Sized>(
    metrics: &mut AgentMetrics,
    uptime_carry: &mut Duration,
    rng: &mut R,
    interval: Duration,
) {
    metrics.cpu += rng.gen_range(-CPU_DRIFT..CPU_DRIFT);
    metrics.memory += rng.gen_range(-MEMORY_DRIFT..MEMORY_DRIFT);
    metrics.requests_per_second += rng.gen_range(-THROUGHPUT_DRIFT..THROUGHPUT_DRIFT);
    metrics.clamp();

    let seconds = interval.as_secs_f64();
    let new_requests = (metrics.requests_per_second * seconds).round() as u64;
    let new_errors = (new_requests as f64 * metrics.error_rate / 100.0).round() as u64;

    *uptime_carry += interval;
    let whole_secs = uptime_carry.as_secs();
    *uptime_carry -= Duration::from_secs(whole_secs);
    metrics.uptime += whole_secs;
    metrics.total_requests += new_requests;
    metrics.total_errors += new_errors;
    metrics.touch();
}

/// Owner of the running timer tasks
#[derive(Debug)]
pub struct SimulationHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl SimulationHandle {
    /// Stop every timer
    pub fn shutdown(mut self) {
        self.abort_all();
        info!("Simulation stopped");
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    fn abort_all(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        self.abort_all();
    }
}

fn spawn_timer<F>(period: Duration, mut step: F) -> JoinHandle<()>
where
    F: FnMut() + Send + 'static,
{
    tokio::spawn(async move {
        // First step one period after start, not immediately
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            step();
        }
    })
}

impl EventSource {
    /// Start the simulation timers
    pub fn spawn_simulation(&self) -> SimulationHandle {
        let config = self.config().clone();
        info!(
            status_interval_ms = config.status_interval.as_millis() as u64,
            log_interval_ms = config.log_interval.as_millis() as u64,
            alert_interval_ms = config.alert_interval.as_millis() as u64,
            campaign_interval_ms = config.campaign_interval.as_millis() as u64,
            "Starting simulation"
        );

        let status = self.clone();
        let logs = self.clone();
        let alerts = self.clone();
        let campaigns = self.clone();

        SimulationHandle {
            tasks: vec![
                spawn_timer(config.status_interval, move || {
                    status.tick_status();
                }),
                spawn_timer(config.log_interval, move || {
                    logs.emit_log();
                }),
                spawn_timer(config.alert_interval, move || {
                    alerts.maybe_emit_alert();
                }),
                spawn_timer(config.campaign_interval, move || {
                    campaigns.emit_campaign_update();
                }),
            ],
        }
    }
}
