//! Demo roster
//!
//! The ten agents of the FinAdvise content pipeline, as they look when the
//! source starts.

use chrono::Utc;
use finadvise_types::{Agent, AgentMetrics, AgentStatus};

struct SeedAgent {
    id: &'static str,
    name: &'static str,
    agent_type: &'static str,
    status: AgentStatus,
    version: &'static str,
    description: &'static str,
    /// cpu, memory, requests/s, error rate, avg response time
    load: [f64; 5],
    uptime: u64,
    total_requests: u64,
    total_errors: u64,
}

const ROSTER: [SeedAgent; 10] = [
    SeedAgent {
        id: "agent-1",
        name: "Content Generator",
        agent_type: "content_generator",
        status: AgentStatus::Active,
        version: "2.1.4",
        description: "Generates personalized financial content",
        load: [45.2, 68.1, 23.4, 0.1, 156.0],
        uptime: 86400,
        total_requests: 15420,
        total_errors: 12,
    },
    SeedAgent {
        id: "agent-2",
        name: "Distribution Controller",
        agent_type: "distribution_controller",
        status: AgentStatus::Active,
        version: "3.0.2",
        description: "Manages message distribution to advisors",
        load: [72.8, 54.3, 45.7, 0.3, 89.0],
        uptime: 72000,
        total_requests: 28940,
        total_errors: 87,
    },
    SeedAgent {
        id: "agent-3",
        name: "Compliance Validator",
        agent_type: "compliance_validator",
        status: AgentStatus::Idle,
        version: "1.8.1",
        description: "Validates content for SEBI compliance",
        load: [12.1, 32.5, 8.2, 0.0, 234.0],
        uptime: 95000,
        total_requests: 5640,
        total_errors: 0,
    },
    SeedAgent {
        id: "agent-4",
        name: "WhatsApp Message Creator",
        agent_type: "whatsapp_message_creator",
        status: AgentStatus::Processing,
        version: "2.5.0",
        description: "Creates engaging WhatsApp messages",
        load: [89.3, 76.8, 156.3, 1.2, 67.0],
        uptime: 45600,
        total_requests: 89234,
        total_errors: 1071,
    },
    SeedAgent {
        id: "agent-5",
        name: "LinkedIn Post Generator",
        agent_type: "linkedin_post_generator",
        status: AgentStatus::Active,
        version: "1.9.3",
        description: "Generates professional LinkedIn content",
        load: [34.7, 45.2, 12.8, 0.5, 298.0],
        uptime: 67800,
        total_requests: 12456,
        total_errors: 62,
    },
    SeedAgent {
        id: "agent-6",
        name: "Market Intelligence",
        agent_type: "market_intelligence",
        status: AgentStatus::Active,
        version: "4.1.0",
        description: "Gathers real-time market insights",
        load: [67.4, 82.1, 34.2, 0.8, 1234.0],
        uptime: 123400,
        total_requests: 45678,
        total_errors: 365,
    },
    SeedAgent {
        id: "agent-7",
        name: "Gemini Image Generator",
        agent_type: "gemini_image_generator",
        status: AgentStatus::Processing,
        version: "1.2.1",
        description: "Generates stunning visual content with AI",
        load: [95.2, 91.7, 5.7, 2.1, 3456.0],
        uptime: 34560,
        total_requests: 3456,
        total_errors: 72,
    },
    SeedAgent {
        id: "agent-8",
        name: "Brand Customizer",
        agent_type: "brand_customizer",
        status: AgentStatus::Idle,
        version: "2.0.4",
        description: "Applies advisor branding to content",
        load: [8.3, 24.1, 2.1, 0.0, 89.0],
        uptime: 89000,
        total_requests: 7890,
        total_errors: 0,
    },
    SeedAgent {
        id: "agent-9",
        name: "Analytics Tracker",
        agent_type: "analytics_tracker",
        status: AgentStatus::Error,
        version: "1.5.2",
        description: "Tracks content performance metrics",
        load: [0.0, 0.0, 0.0, 100.0, 0.0],
        uptime: 0,
        total_requests: 23456,
        total_errors: 2345,
    },
    SeedAgent {
        id: "agent-10",
        name: "Quality Scorer",
        agent_type: "quality_scorer",
        status: AgentStatus::Active,
        version: "3.2.1",
        description: "Evaluates content quality scores",
        load: [56.8, 43.2, 28.9, 0.3, 145.0],
        uptime: 98700,
        total_requests: 67890,
        total_errors: 203,
    },
];

/// Build the demo roster
pub fn demo_roster() -> Vec<Agent> {
    let now = Utc::now();
    ROSTER
        .iter()
        .map(|seed| {
            let [cpu, memory, requests_per_second, error_rate, avg_response_time] = seed.load;
            Agent {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                agent_type: seed.agent_type.to_string(),
                status: seed.status,
                version: seed.version.to_string(),
                description: seed.description.to_string(),
                metrics: AgentMetrics {
                    cpu,
                    memory,
                    requests_per_second,
                    error_rate,
                    avg_response_time,
                    uptime: seed.uptime,
                    total_requests: seed.total_requests,
                    total_errors: seed.total_errors,
                    last_update: now,
                },
            }
        })
        .collect()
}
