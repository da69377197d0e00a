//! Prediction handlers

use std::time::Instant;

use axum::{extract::State, Json};
use chrono::Utc;
use validator::Validate;

use crate::features::AttributeMap;
use crate::metrics::snapshot::round_to;
use crate::model::classify;
use crate::models::{
    BatchPredictionRequest, BatchPredictionResponse, PredictionRequest, PredictionResponse,
};
use crate::sink::PredictionRecord;
use crate::{AppError, AppResult, AppState};

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> AppResult<Json<PredictionResponse>> {
    req.validate()?;
    if !state.model.is_loaded() {
        return Err(AppError::ModelUnavailable);
    }

    state.metrics.record_request();
    let start = Instant::now();

    let (scores, version) = match score(&state, std::slice::from_ref(&req)) {
        Ok(scored) => scored,
        Err(e) => {
            observe(&state, elapsed_ms(start), false, 1);
            return Err(e);
        }
    };

    let prediction = scores[0];
    let prediction_class = classify(prediction);
    let inference_time_ms = elapsed_ms(start);
    observe(&state, inference_time_ms, true, 1);

    state.sinks.dispatch(vec![record(&req, prediction, &version, inference_time_ms)]);

    Ok(Json(PredictionResponse {
        user_id: req.user_id,
        movie_id: req.movie_id,
        prediction,
        prediction_class,
        model_version: version,
        inference_time_ms: round_to(inference_time_ms, 3),
    }))
}

/// `POST /predict/batch`
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictionRequest>,
) -> AppResult<Json<BatchPredictionResponse>> {
    req.validate()?;
    if !state.model.is_loaded() {
        return Err(AppError::ModelUnavailable);
    }

    state.metrics.record_request();
    let start = Instant::now();
    let count = req.predictions.len();

    let (scores, version) = match score(&state, &req.predictions) {
        Ok(scored) => scored,
        Err(e) => {
            observe(&state, elapsed_ms(start) / count as f64, false, 1);
            return Err(e);
        }
    };

    let total_time_ms = elapsed_ms(start);
    let avg_time_per_prediction_ms = total_time_ms / count as f64;

    // Batch latency is attributed evenly to every row
    observe(&state, avg_time_per_prediction_ms, true, count);

    let records = req
        .predictions
        .iter()
        .zip(&scores)
        .map(|(item, &p)| record(item, p, &version, avg_time_per_prediction_ms))
        .collect();
    state.sinks.dispatch(records);

    let predictions = req
        .predictions
        .iter()
        .zip(&scores)
        .map(|(item, &prediction)| PredictionResponse {
            user_id: item.user_id,
            movie_id: item.movie_id,
            prediction,
            prediction_class: classify(prediction),
            model_version: version.clone(),
            // per-row time is reported in avg_time_per_prediction_ms
            inference_time_ms: 0.0,
        })
        .collect();

    Ok(Json(BatchPredictionResponse {
        predictions,
        total_time_ms: round_to(total_time_ms, 3),
        avg_time_per_prediction_ms: round_to(avg_time_per_prediction_ms, 3),
    }))
}

/// Feature extraction + inference for a batch of requests
fn score(state: &AppState, requests: &[PredictionRequest]) -> AppResult<(Vec<f32>, String)> {
    let attributes: Vec<AttributeMap> = requests.iter().map(|r| r.to_attributes()).collect();
    let vectors = state.features.build_batch(&attributes)?;

    if let Some(first) = vectors.first() {
        tracing::debug!(features = %first.log_fields(), rows = vectors.len(), "Scoring batch");
    }

    Ok(state.model.predict(&vectors)?)
}

/// Record `count` outcomes in the aggregator and hand them to the metrics exporters
fn observe(state: &AppState, latency_ms: f64, success: bool, count: usize) {
    for _ in 0..count {
        state.metrics.record_prediction(latency_ms, success);
    }
    state.publisher.record_predictions(latency_ms, success, count);
}

fn record(req: &PredictionRequest, prediction: f32, version: &str, inference_time_ms: f64) -> PredictionRecord {
    PredictionRecord {
        user_id: req.user_id,
        movie_id: req.movie_id,
        age: req.age,
        gender: req.gender.clone(),
        prediction,
        prediction_class: classify(prediction),
        model_version: version.to_string(),
        inference_time_ms,
        timestamp: Utc::now(),
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
