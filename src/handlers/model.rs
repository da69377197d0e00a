//! Model management handlers

use axum::{extract::State, Json};

use crate::features::LayoutInfo;
use crate::models::ReloadResponse;
use crate::{AppError, AppResult, AppState};

/// `POST /model/reload`
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let registry = state.model.clone();
    let version = tokio::task::spawn_blocking(move || registry.reload())
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .map_err(|e| AppError::ReloadFailed(e.to_string()))?;

    Ok(Json(ReloadResponse {
        status: "success".to_string(),
        message: "Model reloaded successfully".to_string(),
        model_version: version,
    }))
}

/// `GET /model/info` - the feature layout the model is served with
pub async fn info() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
