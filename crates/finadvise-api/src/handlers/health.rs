//! Health Check Handler

use axum::{extract::State, Json};
use chrono::Utc;
use std::sync::Arc;

use finadvise_types::HealthResponse;

use crate::state::AppState;

/// Health check endpoint
///
/// Returns 200 while the process is serving.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        uptime_seconds: state.uptime().as_secs(),
    })
}
