//! Log History Handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use finadvise_types::{LogEntry, LogsQuery, DEFAULT_LOG_LIMIT};

use crate::error::ApiResult;
use crate::state::AppState;

/// Read `limit` the lenient way
///
/// Leading digits count (`"12abc"` is 12). Text without digits, a missing
/// value and zero fall back to the default; a negative number asks for
/// nothing.
fn effective_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_LOG_LIMIT;
    };
    let raw = raw.trim_start();
    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return DEFAULT_LOG_LIMIT;
    }
    match rest[..digits].parse::<usize>().unwrap_or(usize::MAX) {
        0 => DEFAULT_LOG_LIMIT,
        _ if negative => 0,
        limit => limit,
    }
}

/// Recent log lines across all agents, most recent first
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<LogEntry>>> {
    Ok(Json(state.source.recent_logs(effective_limit(query.limit.as_deref()), None)?))
}

/// Recent log lines of one agent, most recent first
pub async fn agent_logs(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<LogsQuery>,
) -> ApiResult<Json<Vec<LogEntry>>> {
    Ok(Json(state.source.recent_logs(effective_limit(query.limit.as_deref()), Some(&id))?))
}
