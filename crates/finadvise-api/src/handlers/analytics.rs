//! Analytics Handlers

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use finadvise_types::{DataPoint, OverviewMetrics};

use crate::state::AppState;

/// Dashboard overview for the last 24 hours
pub async fn overview(State(state): State<Arc<AppState>>) -> Json<OverviewMetrics> {
    Json(state.source.overview())
}

/// Per-minute series for a metric; any metric name is accepted
pub async fn realtime(
    State(state): State<Arc<AppState>>,
    Path(metric): Path<String>,
) -> Json<Vec<DataPoint>> {
    Json(state.source.realtime_series(&metric))
}
