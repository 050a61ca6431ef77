//! Server Configuration
//!
//! Layered from config files, `FINADVISE__*` environment variables and CLI
//! flags, in increasing precedence.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use finadvise_api::ApiConfig;
use finadvise_source::SimulationConfig;

/// Server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub simulation: SimulationSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server binding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Grace period for in-flight requests after a shutdown signal
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerSettings {
    /// Resolve the address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid bind address {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address for host {}", self.host))
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// CORS allowed origins; `*` allows any
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    #[serde(default = "default_true")]
    pub enable_tracing: bool,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: default_cors_origins(),
            enable_tracing: true,
        }
    }
}

impl ApiSettings {
    pub fn to_api_config(&self) -> ApiConfig {
        ApiConfig {
            enable_cors: self.enable_cors,
            cors_origins: self.cors_origins.clone(),
            enable_tracing: self.enable_tracing,
        }
    }
}

/// Simulation timers and knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_status_interval")]
    pub status_interval_ms: u64,

    #[serde(default = "default_log_interval")]
    pub log_interval_ms: u64,

    #[serde(default = "default_alert_interval")]
    pub alert_interval_ms: u64,

    /// Chance in [0, 1] that an alert roll raises an alert
    #[serde(default = "default_alert_probability")]
    pub alert_probability: f64,

    #[serde(default = "default_campaign_interval")]
    pub campaign_interval_ms: u64,

    #[serde(default = "default_restart_delay")]
    pub restart_delay_ms: u64,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            status_interval_ms: default_status_interval(),
            log_interval_ms: default_log_interval(),
            alert_interval_ms: default_alert_interval(),
            alert_probability: default_alert_probability(),
            campaign_interval_ms: default_campaign_interval(),
            restart_delay_ms: default_restart_delay(),
            seed: None,
            bus_capacity: default_bus_capacity(),
        }
    }
}

impl SimulationSettings {
    pub fn to_simulation_config(&self) -> SimulationConfig {
        SimulationConfig {
            status_interval: Duration::from_millis(self.status_interval_ms),
            log_interval: Duration::from_millis(self.log_interval_ms),
            alert_interval: Duration::from_millis(self.alert_interval_ms),
            alert_probability: self.alert_probability,
            campaign_interval: Duration::from_millis(self.campaign_interval_ms),
            restart_delay: Duration::from_millis(self.restart_delay_ms),
            seed: self.seed,
            bus_capacity: self.bus_capacity,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// =============================================================================
// Default Functions
// =============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_shutdown_timeout() -> u64 {
    5
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_status_interval() -> u64 {
    2_000
}

fn default_log_interval() -> u64 {
    5_000
}

fn default_alert_interval() -> u64 {
    15_000
}

fn default_alert_probability() -> f64 {
    0.3
}

fn default_campaign_interval() -> u64 {
    10_000
}

fn default_restart_delay() -> u64 {
    3_000
}

fn default_bus_capacity() -> usize {
    1024
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Configuration Loading
// =============================================================================

impl ServerConfig {
    /// Load configuration from environment and optional config file
    pub fn load(config_path: Option<&str>) -> anyhow::Result<Self> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("FINADVISE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to read configuration")?;
        config
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Reject settings the simulation cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        let sim = &self.simulation;
        let periods = [
            ("status_interval_ms", sim.status_interval_ms),
            ("log_interval_ms", sim.log_interval_ms),
            ("alert_interval_ms", sim.alert_interval_ms),
            ("campaign_interval_ms", sim.campaign_interval_ms),
        ];
        for (name, value) in periods {
            if value == 0 {
                anyhow::bail!("simulation.{} must be greater than zero", name);
            }
        }
        if !(0.0..=1.0).contains(&sim.alert_probability) {
            anyhow::bail!(
                "simulation.alert_probability must be within [0, 1], got {}",
                sim.alert_probability
            );
        }
        if sim.bus_capacity == 0 {
            anyhow::bail!("simulation.bus_capacity must be greater than zero");
        }
        Ok(())
    }
}
