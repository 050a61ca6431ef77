//! Simulation configuration

use std::time::Duration;

use crate::bus::DEFAULT_BUS_CAPACITY;

/// Timer periods and knobs of the simulated source
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Period of the metrics tick
    pub status_interval: Duration,
    /// Period of the log stream
    pub log_interval: Duration,
    /// Period of the alert roll
    pub alert_interval: Duration,
    /// Chance that an alert roll raises an alert
    pub alert_probability: f64,
    /// Period of the campaign event stream
    pub campaign_interval: Duration,
    /// Delay before a restarting agent becomes active
    pub restart_delay: Duration,
    /// Fixed RNG seed; entropy when `None`
    pub seed: Option<u64>,
    /// Events buffered per subscriber before it lags
    pub bus_capacity: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            status_interval: Duration::from_secs(2),
            log_interval: Duration::from_secs(5),
            alert_interval: Duration::from_secs(15),
            alert_probability: 0.3,
            campaign_interval: Duration::from_secs(10),
            restart_delay: Duration::from_secs(3),
            seed: None,
            bus_capacity: DEFAULT_BUS_CAPACITY,
        }
    }
}

impl SimulationConfig {
    /// Deterministic configuration for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Default::default()
        }
    }
}
