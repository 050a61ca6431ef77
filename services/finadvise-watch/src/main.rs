//! FinAdvise Watch - command-line consumer of the demo event source
//!
//! # Quick Start
//!
//! ```bash
//! # Start the demo server first (in one terminal)
//! cargo run -p finadvise-demo-server
//!
//! # Then inspect and drive it
//! finadvise-watch agents
//! finadvise-watch restart agent-3
//! finadvise-watch logs --limit 20
//! finadvise-watch watch --logs
//! ```

use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finadvise_client::{ApiClient, ClientConfig, ClientError};

mod display;
mod watch;

/// FinAdvise Watch - inspect and drive the demo event source
#[derive(Parser, Debug)]
#[command(name = "finadvise-watch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// HTTP API base URL [default: $FINADVISE_API_URL or http://localhost:3001/api]
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Event stream URL [default: $FINADVISE_WEBSOCKET_URL or ws://localhost:3001/ws]
    #[arg(long, global = true)]
    ws_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "FINADVISE_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the agent roster
    Agents,

    /// Show one agent's status and metrics
    Status { id: String },

    /// Start an agent
    Start { id: String },

    /// Stop an agent
    Stop { id: String },

    /// Restart an agent; completion arrives on the event stream
    Restart { id: String },

    /// Show recent log lines
    Logs {
        /// Number of lines (server default 100, max 1000)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only lines of this agent
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// Show the dashboard overview
    Overview,

    /// Follow the live event stream until Ctrl+C
    Watch {
        /// Seconds between summaries
        #[arg(long, default_value = "10")]
        summary_secs: u64,

        /// Print streamed log lines
        #[arg(long)]
        logs: bool,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone());
        }
        if let Some(url) = &self.ws_url {
            config = config.with_ws_url(url.clone());
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config = cli.client_config();
    match run(cli.command, config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            display::error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

async fn run(command: Commands, config: ClientConfig) -> anyhow::Result<()> {
    if let Commands::Watch { summary_secs, logs } = command {
        let every = Duration::from_secs(summary_secs.max(1));
        return watch::run(config, every, logs).await;
    }

    let api = ApiClient::new(&config.api_url, config.request_timeout)?;
    match command {
        Commands::Agents => {
            let agents = api.list_agents().await.map_err(unreachable_hint)?;
            display::section(&format!("Agents ({})", agents.len()));
            for agent in &agents {
                display::agent_row(agent);
            }
        }
        Commands::Status { id } => {
            let status = api.agent_status(&id).await.map_err(unreachable_hint)?;
            display::section(&id);
            display::kv("Status", &display::status_label(status.status).to_string());
            display::kv("CPU", &format!("{:.1}%", status.metrics.cpu));
            display::kv("Memory", &format!("{:.1}%", status.metrics.memory));
            display::kv("Requests/s", &format!("{:.1}", status.metrics.requests_per_second));
            display::kv("Error rate", &format!("{:.2}%", status.metrics.error_rate));
            display::kv("Uptime", &format!("{}s", status.metrics.uptime));
            display::kv("Total requests", &status.metrics.total_requests.to_string());
        }
        Commands::Start { id } => {
            let ack = api.start_agent(&id).await.map_err(unreachable_hint)?;
            display::success(&format!("{} -> {:?}", id, ack.status));
        }
        Commands::Stop { id } => {
            let ack = api.stop_agent(&id).await.map_err(unreachable_hint)?;
            display::success(&format!("{} -> {:?}", id, ack.status));
        }
        Commands::Restart { id } => {
            let ack = api.restart_agent(&id).await.map_err(unreachable_hint)?;
            display::success(&format!("{} -> {:?}", id, ack.status));
        }
        Commands::Logs { limit, agent } => {
            let entries = match &agent {
                Some(id) => api.agent_logs(id, limit).await,
                None => api.logs(limit).await,
            }
            .map_err(unreachable_hint)?;
            display::section(&format!("Logs ({})", entries.len()));
            for entry in &entries {
                display::log_line(entry);
            }
        }
        Commands::Overview => {
            let metrics = api.overview().await.map_err(unreachable_hint)?;
            display::section("Overview (last 24h)");
            display::overview(&metrics);
        }
        Commands::Watch { .. } => {}
    }
    Ok(())
}

/// Point at the server when the request never reached it
fn unreachable_hint(error: ClientError) -> anyhow::Error {
    match error {
        ClientError::Network(e) if e.is_connect() => {
            anyhow::anyhow!("Cannot reach the FinAdvise API ({}). Is the demo server running?", e)
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subcommand_parsing() {
        let cli = Cli::parse_from(["finadvise-watch", "logs", "--limit", "20"]);
        match cli.command {
            Commands::Logs { limit, agent } => {
                assert_eq!(limit, Some(20));
                assert!(agent.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["finadvise-watch", "restart", "agent-3"]);
        assert!(matches!(cli.command, Commands::Restart { id } if id == "agent-3"));
    }

    #[test]
    fn test_url_overrides() {
        let cli = Cli::parse_from([
            "finadvise-watch",
            "--api-url",
            "http://demo:9000/api",
            "--ws-url",
            "ws://demo:9000/ws",
            "agents",
        ]);
        let config = cli.client_config();
        assert_eq!(config.api_url, "http://demo:9000/api");
        assert_eq!(config.ws_url, "ws://demo:9000/ws");
    }

    #[test]
    fn test_env_file_feeds_client_config() {
        let path = std::env::temp_dir().join(format!("finadvise-watch-{}.env", std::process::id()));
        std::fs::write(&path, "FINADVISE_WEBSOCKET_URL=ws://from-env-file:4000/ws\n").unwrap();
        dotenvy::from_path(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let cli = Cli::parse_from(["finadvise-watch", "agents"]);
        assert_eq!(cli.client_config().ws_url, "ws://from-env-file:4000/ws");
    }

    #[test]
    fn test_watch_defaults() {
        let cli = Cli::parse_from(["finadvise-watch", "watch"]);
        assert!(matches!(cli.command, Commands::Watch { summary_secs: 10, logs: false }));
    }
}
