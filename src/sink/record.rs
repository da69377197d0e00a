//! Prediction Record - flat row handed to sinks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub user_id: i64,
    pub movie_id: i64,
    pub age: i64,
    pub gender: String,
    pub prediction: f32,
    pub prediction_class: u8,
    pub model_version: String,
    pub inference_time_ms: f64,
    pub timestamp: DateTime<Utc>,
}
