//! Service status models

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` when a model is loaded, `degraded` otherwise
    pub status: String,
    pub model_loaded: bool,
    pub model_version: Option<String>,
    pub environment: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub message: String,
    pub model_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetResponse {
    pub status: String,
}
