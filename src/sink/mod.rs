//! Sink Module - best-effort prediction persistence
//!
//! Sinks run off the serving path. A failing sink is logged and ignored;
//! nothing here can fail or delay a prediction response. Metric data points
//! for an external metrics system are published the same way.

pub mod dispatcher;
pub mod http;
pub mod jsonl;
pub mod log;
pub mod metrics;
pub mod record;
pub mod worker;

pub use dispatcher::SinkDispatcher;
pub use http::HttpSink;
pub use jsonl::JsonlSink;
pub use log::LogSink;
pub use metrics::{MetricsExporter, MetricsPublisher};
pub use record::PredictionRecord;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("collector request failed: {0}")]
    Http(String),
}

/// Destination for prediction records
pub trait PredictionSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Persist one batch. Called from the sink's worker thread.
    fn write(&self, records: &[PredictionRecord]) -> Result<(), SinkError>;
}
