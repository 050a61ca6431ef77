//! Fixed demo tables
//!
//! Message pools and static listings the timers and read endpoints draw from.

use chrono::Utc;
use finadvise_types::{Advisor, AlertKind, AlertSeverity, Campaign, CampaignStatus};

/// Messages emitted on `log:stream`
pub const STREAM_LOG_MESSAGES: [&str; 10] = [
    "Processing new campaign workflow",
    "WhatsApp template approved by compliance",
    "Content quality check passed",
    "Performance threshold optimized",
    "Advisor engagement tracked successfully",
    "Real-time sync completed with Google Sheets",
    "Brand customization applied to template",
    "Market intelligence data updated",
    "Content distribution completed",
    "Analytics metrics calculated",
];

/// Messages used by the log history endpoints
pub const HISTORY_LOG_MESSAGES: [&str; 10] = [
    "Processing campaign request successfully",
    "WhatsApp message delivered to advisor",
    "Template validation completed",
    "Content generation finished",
    "Advisor data synchronized from Google Sheets",
    "Performance metrics updated",
    "Compliance check passed",
    "Brand customization applied",
    "Image generation completed",
    "Quality score calculated",
];

/// Messages emitted on `campaign:update`
pub const CAMPAIGN_EVENT_MESSAGES: [&str; 10] = [
    "Campaign \"Daily Market Updates\" launched successfully",
    "Template \"Investment Insights\" approved by compliance team",
    "Advisor segmentation analysis completed",
    "WhatsApp bulk delivery completed (234 messages)",
    "Performance report generated for last 24 hours",
    "New advisor onboarded via Google Sheets",
    "Content quality score improved by 15%",
    "Brand customization applied to 12 templates",
    "Real-time analytics dashboard updated",
    "Campaign engagement rate exceeded target",
];

/// Shape of an alert the alert timer can raise
#[derive(Debug, Clone, Copy)]
pub struct AlertTemplate {
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: &'static str,
}

pub const ALERT_TEMPLATES: [AlertTemplate; 5] = [
    AlertTemplate {
        kind: AlertKind::Warning,
        severity: AlertSeverity::Medium,
        title: "High Resource Usage Detected",
    },
    AlertTemplate {
        kind: AlertKind::Info,
        severity: AlertSeverity::Low,
        title: "Performance Optimization Available",
    },
    AlertTemplate {
        kind: AlertKind::Error,
        severity: AlertSeverity::High,
        title: "Agent Communication Error",
    },
    AlertTemplate {
        kind: AlertKind::Warning,
        severity: AlertSeverity::Medium,
        title: "Memory Usage Above Threshold",
    },
    AlertTemplate {
        kind: AlertKind::Info,
        severity: AlertSeverity::Low,
        title: "Scheduled Maintenance Reminder",
    },
];

/// Alert body text for an agent
pub fn alert_message(agent_name: &str, title: &str) -> String {
    format!("{} requires attention - {}", agent_name, title.to_lowercase())
}

/// Campaign listing
pub fn campaigns() -> Vec<Campaign> {
    vec![
        Campaign {
            id: "camp-1".to_string(),
            name: "Daily Market Updates".to_string(),
            status: CampaignStatus::Active,
            advisors: 234,
            messages: 12450,
            engagement: 23.4,
        },
        Campaign {
            id: "camp-2".to_string(),
            name: "Investment Insights".to_string(),
            status: CampaignStatus::Scheduled,
            advisors: 180,
            messages: 0,
            engagement: 0.0,
        },
    ]
}

/// Advisor listing; `last_active` is the time of the call
pub fn advisors() -> Vec<Advisor> {
    let now = Utc::now();
    vec![
        Advisor {
            id: "adv-1".to_string(),
            name: "Shriya Vallabh".to_string(),
            phone: "+91-9876543210".to_string(),
            segment: "Premium".to_string(),
            engagement: 45.2,
            last_active: now,
        },
        Advisor {
            id: "adv-2".to_string(),
            name: "Avalok Sharma".to_string(),
            phone: "+91-9876543211".to_string(),
            segment: "Standard".to_string(),
            engagement: 67.8,
            last_active: now,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_message_lowercases_title() {
        assert_eq!(
            alert_message("Quality Scorer", "Agent Communication Error"),
            "Quality Scorer requires attention - agent communication error"
        );
    }
}
