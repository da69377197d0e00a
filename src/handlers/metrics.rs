//! Metrics handlers

use axum::{extract::State, Json};

use crate::metrics::MetricsReport;
use crate::models::ResetResponse;
use crate::AppState;

/// `GET /metrics`
pub async fn get(State(state): State<AppState>) -> Json<MetricsReport> {
    let summary = state.metrics.snapshot().summary();
    Json(MetricsReport::from(&summary))
}

/// `POST /metrics/reset`
pub async fn reset(State(state): State<AppState>) -> Json<ResetResponse> {
    state.metrics.reset();
    Json(ResetResponse {
        status: "success".to_string(),
    })
}
