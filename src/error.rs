//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::features::FeatureError;
use crate::model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    InvalidRequest(String),

    // Model errors
    ModelUnavailable,
    ReloadFailed(String),

    // Serving errors
    FeatureExtraction(String),
    Inference(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    /// Machine-readable error kind, lets operators tell bad input apart
    /// from infrastructure failures
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "invalid_request",
            AppError::ModelUnavailable => "model_unavailable",
            AppError::ReloadFailed(_) => "model_reload_failed",
            AppError::FeatureExtraction(_) => "feature_extraction_failed",
            AppError::Inference(_) => "inference_failed",
            AppError::InternalError(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::ReloadFailed(_)
            | AppError::FeatureExtraction(_)
            | AppError::Inference(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::ModelUnavailable => write!(f, "Model not loaded"),
            AppError::ReloadFailed(msg) => write!(f, "Model reload failed: {}", msg),
            AppError::FeatureExtraction(msg) => write!(f, "Prediction failed: {}", msg),
            AppError::Inference(msg) => write!(f, "Prediction failed: {}", msg),
            AppError::InternalError(_) => write!(f, "Internal server error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            AppError::FeatureExtraction(msg) => tracing::error!("Feature extraction error: {}", msg),
            AppError::Inference(msg) => tracing::error!("Inference error: {}", msg),
            AppError::ReloadFailed(msg) => tracing::error!("Model reload error: {}", msg),
            AppError::InternalError(msg) => tracing::error!("Internal error: {}", msg),
            AppError::InvalidRequest(_) | AppError::ModelUnavailable => {}
        }

        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::FeatureExtraction(err.to_string())
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::NotLoaded => AppError::ModelUnavailable,
            other => AppError::Inference(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_and_unavailable_are_distinct() {
        let feature: AppError = FeatureError::NotNumeric {
            feature: "age".to_string(),
            value: "x".to_string(),
        }
        .into();
        let unavailable: AppError = ModelError::NotLoaded.into();

        assert_eq!(feature.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_ne!(feature.kind(), unavailable.kind());
    }

    #[test]
    fn test_inference_error_mapping() {
        let err: AppError = ModelError::Inference("boom".to_string()).into();
        assert_eq!(err.kind(), "inference_failed");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
