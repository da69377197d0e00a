//! Health check handler

use axum::{extract::State, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// `GET /` - always `ok` while the process is serving
pub async fn root(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health_response(&state, "ok"))
}

/// `GET /health` - `degraded` while no model is loaded
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.model.is_loaded() { "ok" } else { "degraded" };
    Json(health_response(&state, status))
}

fn health_response(state: &AppState, status: &str) -> HealthResponse {
    HealthResponse {
        status: status.to_string(),
        model_loaded: state.model.is_loaded(),
        model_version: state.model.version(),
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}
