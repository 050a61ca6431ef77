//! Agent Handlers
//!
//! Roster reads and operator commands. Command responses are only an
//! acknowledgement; the resulting state change is published on the event bus.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use finadvise_types::{Agent, CommandResponse, StatusResponse};

use crate::error::ApiResult;
use crate::state::AppState;

/// List every agent
pub async fn list_agents(State(state): State<Arc<AppState>>) -> Json<Vec<Agent>> {
    Json(state.source.list_agents())
}

/// Current status and metrics of one agent
pub async fn agent_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StatusResponse>> {
    Ok(Json(state.source.agent_status(&id)?))
}

pub async fn start_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommandResponse>> {
    let ack = state.source.start_agent(&id)?;
    Ok(Json(CommandResponse::ok(ack)))
}

pub async fn stop_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommandResponse>> {
    let ack = state.source.stop_agent(&id)?;
    Ok(Json(CommandResponse::ok(ack)))
}

/// Accept a restart; completion arrives later as an `agent:status` event
pub async fn restart_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<CommandResponse>> {
    let ack = state.source.restart_agent(&id)?;
    Ok(Json(CommandResponse::ok(ack)))
}
