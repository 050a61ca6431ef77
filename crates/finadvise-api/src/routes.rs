//! API Routes
//!
//! Route definitions for all endpoints under `/api`.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Create the `/api` routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Agents
        .merge(agent_routes())
        // System logs
        .route("/logs", get(handlers::logs::list_logs))
        // Static listings
        .route("/campaigns", get(handlers::catalog::list_campaigns))
        .route("/advisors", get(handlers::catalog::list_advisors))
        // Analytics
        .route("/analytics/overview", get(handlers::analytics::overview))
        .route("/analytics/realtime/:metric", get(handlers::analytics::realtime))
}

/// Agent routes
fn agent_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/agents", get(handlers::agents::list_agents))
        .route("/agents/:id/status", get(handlers::agents::agent_status))
        .route("/agents/:id/start", post(handlers::agents::start_agent))
        .route("/agents/:id/stop", post(handlers::agents::stop_agent))
        .route("/agents/:id/restart", post(handlers::agents::restart_agent))
        .route("/agents/:id/logs", get(handlers::logs::agent_logs))
}
