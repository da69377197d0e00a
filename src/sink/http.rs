//! HTTP Sink - POSTs prediction batches to a collector endpoint

use std::time::Duration;

use serde::Serialize;

use super::{PredictionRecord, PredictionSink, SinkError};

#[derive(Debug, Serialize)]
struct CollectorPayload<'a> {
    event_type: &'static str,
    count: usize,
    predictions: &'a [PredictionRecord],
}

/// Blocking JSON client shared by the collector and metrics exporters
pub struct JsonPoster {
    url: String,
    agent: ureq::Agent,
}

impl JsonPoster {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn post<T: Serialize>(&self, payload: &T) -> Result<(), SinkError> {
        self.agent
            .post(&self.url)
            .send_json(serde_json::to_value(payload)?)
            .map_err(|e| SinkError::Http(format!("{}: {}", self.url, e)))?;
        Ok(())
    }
}

pub struct HttpSink {
    poster: JsonPoster,
}

impl HttpSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            poster: JsonPoster::new(url, timeout),
        }
    }
}

impl PredictionSink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    fn write(&self, records: &[PredictionRecord]) -> Result<(), SinkError> {
        if records.is_empty() {
            return Ok(());
        }

        self.poster.post(&CollectorPayload {
            event_type: "prediction",
            count: records.len(),
            predictions: records,
        })?;

        tracing::debug!("Posted {} predictions to collector", records.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_unreachable_collector_is_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let sink = HttpSink::new("http://127.0.0.1:9/collect", Duration::from_millis(200));
        let record = PredictionRecord {
            user_id: 1,
            movie_id: 2,
            age: 30,
            gender: "F".to_string(),
            prediction: 0.1,
            prediction_class: 0,
            model_version: "v".to_string(),
            inference_time_ms: 0.5,
            timestamp: Utc::now(),
        };

        assert!(matches!(sink.write(&[record]), Err(SinkError::Http(_))));
    }
}
