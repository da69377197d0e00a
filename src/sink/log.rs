//! Log Sink - one structured tracing event per prediction

use super::{PredictionRecord, PredictionSink, SinkError};

pub struct LogSink;

impl PredictionSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn write(&self, records: &[PredictionRecord]) -> Result<(), SinkError> {
        for r in records {
            tracing::info!(
                target: "predictions",
                event_type = "prediction",
                user_id = r.user_id,
                movie_id = r.movie_id,
                prediction = r.prediction,
                prediction_class = r.prediction_class,
                inference_time_ms = r.inference_time_ms,
                model_version = %r.model_version,
                "prediction served"
            );
        }
        Ok(())
    }
}
