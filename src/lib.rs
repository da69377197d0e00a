//! Prediction Serving
//!
//! Turns loosely typed feature payloads into the fixed model input layout,
//! scores them with a gradient-boosted-tree model and keeps in-process
//! serving metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PREDICTION SERVING                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  HTTP (Axum) ──► features ──► model ──► response             │
//! │                                 │                            │
//! │            metrics aggregator ◄─┤                            │
//! │                                 └──► sink workers (bounded)  │
//! │                                      records + metric points │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod metrics;
pub mod model;
pub mod models;
pub mod sink;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

use config::Config;
use features::FeatureVectorBuilder;
use metrics::MetricsAggregator;
use model::ModelRegistry;
use sink::{MetricsPublisher, SinkDispatcher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub model: Arc<ModelRegistry>,
    pub metrics: Arc<MetricsAggregator>,
    pub features: FeatureVectorBuilder,
    pub sinks: SinkDispatcher,
    pub publisher: MetricsPublisher,
}

impl AppState {
    pub fn new(
        config: Config,
        model: ModelRegistry,
        sinks: SinkDispatcher,
        publisher: MetricsPublisher,
    ) -> Self {
        Self {
            config,
            model: Arc::new(model),
            metrics: Arc::new(MetricsAggregator::new()),
            features: FeatureVectorBuilder::new(),
            sinks,
            publisher,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Status
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))

        // Predictions
        .route("/predict", post(handlers::predict::predict))
        .route("/predict/batch", post(handlers::predict::predict_batch))

        // Metrics
        .route("/metrics", get(handlers::metrics::get))
        .route("/metrics/reset", post(handlers::metrics::reset))

        // Model management
        .route("/model/reload", post(handlers::model::reload))
        .route("/model/info", get(handlers::model::info))

        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
