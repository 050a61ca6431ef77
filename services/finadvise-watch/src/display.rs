//! Terminal output helpers

use colored::*;

use finadvise_client::{AgentSummary, ConnectionSnapshot, ConnectionState, SystemStatus};
use finadvise_types::{
    Agent, AgentStatus, AlertSeverity, LogEntry, LogLevel, OverviewMetrics, SystemAlert,
};

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", "━".repeat(60).bright_black());
    println!(" {}", title.bright_white().bold());
    println!("{}", "━".repeat(60).bright_black());
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".bright_green(), message);
}

pub fn error(message: &str) {
    eprintln!("  {} {}", "✗".bright_red(), message.bright_red());
}

pub fn info(message: &str) {
    println!("  {} {}", "→".bright_blue(), message);
}

pub fn warning(message: &str) {
    println!("  {} {}", "⚠".yellow(), message.yellow());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("      {}: {}", key, value.bright_cyan());
}

pub fn status_label(status: AgentStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        AgentStatus::Active => label.bright_green(),
        AgentStatus::Processing => label.bright_blue(),
        AgentStatus::Idle => label.bright_black(),
        AgentStatus::Error => label.bright_red(),
        AgentStatus::Maintenance => label.magenta(),
        AgentStatus::Stopped => label.yellow(),
    }
}

fn level_label(level: LogLevel) -> ColoredString {
    let label = format!("{:<5}", level.as_str().to_uppercase());
    match level {
        LogLevel::Debug => label.bright_black(),
        LogLevel::Info => label.bright_blue(),
        LogLevel::Warn => label.yellow(),
        LogLevel::Error => label.bright_red(),
    }
}

fn severity_label(severity: AlertSeverity) -> ColoredString {
    let label = severity.as_str();
    match severity {
        AlertSeverity::Critical => label.bright_red().bold(),
        AlertSeverity::High => label.bright_red(),
        AlertSeverity::Medium => label.yellow(),
        AlertSeverity::Low => label.bright_black(),
    }
}

pub fn agent_row(agent: &Agent) {
    println!(
        "  {:<10} {:<26} {:<12} cpu {:>5.1}%  mem {:>5.1}%  {:>6.1} req/s",
        agent.id,
        agent.name,
        status_label(agent.status),
        agent.metrics.cpu,
        agent.metrics.memory,
        agent.metrics.requests_per_second,
    );
}

pub fn log_line(entry: &LogEntry) {
    println!(
        "  {} {} {:<24} {}",
        entry.timestamp.format("%H:%M:%S").to_string().bright_black(),
        level_label(entry.level),
        entry.source,
        entry.message,
    );
}

pub fn alert_line(alert: &SystemAlert) {
    println!(
        "  {} [{}] {}: {}",
        "⚠".yellow(),
        severity_label(alert.severity),
        alert.title.bright_white(),
        alert.message,
    );
}

pub fn overview(metrics: &OverviewMetrics) {
    kv("Total messages", &metrics.total_messages.to_string());
    kv("Active agents", &metrics.active_agents.to_string());
    kv("Active campaigns", &metrics.active_campaigns.to_string());
    kv("Advisors", &metrics.total_advisors.to_string());
    kv("Delivery rate", &format!("{:.1}%", metrics.delivery_rate));
    kv("Engagement rate", &format!("{:.1}%", metrics.engagement_rate));
    kv("System health", &format!("{}%", metrics.system_health));
}

pub fn connection(snapshot: &ConnectionSnapshot) {
    let state = snapshot.state.to_string();
    let message = match &snapshot.last_error {
        Some(error) => format!("Connection {} ({})", state, error),
        None => format!("Connection {}", state),
    };
    match snapshot.state {
        ConnectionState::Connected => success(&message),
        ConnectionState::Connecting => info(&message),
        ConnectionState::Disconnected | ConnectionState::Error => warning(&message),
    }
}

pub fn summary(summary: &AgentSummary, status: SystemStatus, health: f64, unread_alerts: usize) {
    let status_text = status.to_string();
    let status_text = match status {
        SystemStatus::Healthy => status_text.bright_green(),
        SystemStatus::Warning => status_text.yellow(),
        SystemStatus::Critical => status_text.bright_red().bold(),
        SystemStatus::Offline => status_text.bright_black(),
    };
    println!(
        "  {} {} | health {:.0}% | agents {} ({} active, {} error) | cpu {:.1}% mem {:.1}% | {} requests | {} unread alerts",
        "●".bright_blue(),
        status_text,
        health,
        summary.total,
        summary.active,
        summary.error,
        summary.avg_cpu,
        summary.avg_memory,
        summary.total_requests,
        unread_alerts,
    );
}
