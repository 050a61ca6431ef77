//! FinAdvise Demo Server
//!
//! Runs the simulated agent roster and serves it over HTTP and WebSocket.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (port 3001)
//! finadvise-demo-server
//!
//! # Start with a config file
//! finadvise-demo-server --config config/demo.toml
//!
//! # Reproducible run with environment overrides
//! FINADVISE__SIMULATION__SEED=42 FINADVISE__SERVER__PORT=8080 finadvise-demo-server
//! ```

mod config;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use clap::Parser;
use tokio::signal;
use tokio::sync::Notify;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finadvise_api::{create_router, AppState};
use finadvise_source::EventSource;

use crate::config::{LoggingConfig, ServerConfig};

// =============================================================================
// CLI Arguments
// =============================================================================

/// FinAdvise Demo Server - simulated agent event source
#[derive(Parser, Debug)]
#[command(name = "finadvise-demo-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "FINADVISE_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "FINADVISE_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FINADVISE_PORT")]
    port: Option<u16>,

    /// Fixed simulation seed
    #[arg(long, env = "FINADVISE_SEED")]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FINADVISE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "FINADVISE_LOG_FORMAT")]
    log_format: Option<String>,
}

impl Args {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        if let Some(level) = self.log_level {
            config.logging.level = level;
        }
        if let Some(format) = self.log_format {
            config.logging.format = format;
        }
    }
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut server_config = ServerConfig::load(args.config.as_deref())?;
    args.apply(&mut server_config);

    init_logging(&server_config.logging);
    server_config.validate()?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = ?server_config.simulation.seed,
        "Starting FinAdvise demo server"
    );

    let (app, source) = build_app(&server_config);
    let simulation = source.spawn_simulation();

    let addr = server_config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server listening");

    let shutdown = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let shutdown = shutdown.clone();
        async move {
            shutdown_signal().await;
            shutdown.notify_one();
        }
    });

    let grace = server_config.server.shutdown_timeout();
    tokio::select! {
        result = server.into_future() => result?,
        _ = drain_deadline(&shutdown, grace) => {
            tracing::warn!(timeout_secs = grace.as_secs(), "In-flight requests did not finish, forcing shutdown");
        }
    }

    simulation.shutdown();
    tracing::info!("Server shutdown complete");

    Ok(())
}

// =============================================================================
// Initialization Functions
// =============================================================================

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            subscriber
                .with(fmt::layer().json().with_target(true))
                .init();
        }
        _ => {
            subscriber
                .with(fmt::layer().pretty().with_target(true))
                .init();
        }
    }
}

/// Event source and router for a configuration
fn build_app(config: &ServerConfig) -> (Router, EventSource) {
    let source = EventSource::new(config.simulation.to_simulation_config());
    let state = Arc::new(AppState::new(source.clone()));
    let router = create_router(state, config.api.to_api_config());
    (router, source)
}

// =============================================================================
// Graceful Shutdown
// =============================================================================

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Resolves `grace` after the shutdown signal fired
async fn drain_deadline(shutdown: &Notify, grace: Duration) {
    shutdown.notified().await;
    tokio::time::sleep(grace).await;
}

// =============================================================================
// Tests
// =============================================================================
