//! Metrics Exporter - per-prediction data points for an external metrics system
//!
//! Every observed prediction yields `InferenceTime`, `RequestTime`,
//! `RequestCount` and, on failure, `ErrorCount`. Data points go through the
//! same bounded workers as prediction records, so a slow metrics backend
//! drops points instead of slowing requests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::http::JsonPoster;
use super::worker::{spawn_all, SinkWorker, SINK_QUEUE_CAPACITY};
use super::SinkError;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Count,
    Milliseconds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDatum {
    pub metric_name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub timestamp: DateTime<Utc>,
}

impl MetricDatum {
    fn new(name: &str, value: f64, unit: MetricUnit, timestamp: DateTime<Utc>) -> Self {
        Self {
            metric_name: name.to_string(),
            value,
            unit,
            timestamp,
        }
    }
}

/// Data points for `count` predictions that each took `latency_ms`
pub fn prediction_data(
    latency_ms: f64,
    success: bool,
    count: usize,
    timestamp: DateTime<Utc>,
) -> Vec<MetricDatum> {
    let per_prediction = if success { 3 } else { 4 };
    let mut data = Vec::with_capacity(count * per_prediction);

    for _ in 0..count {
        data.push(MetricDatum::new("InferenceTime", latency_ms, MetricUnit::Milliseconds, timestamp));
        // requests are served in one pass, so request time equals inference time
        data.push(MetricDatum::new("RequestTime", latency_ms, MetricUnit::Milliseconds, timestamp));
        data.push(MetricDatum::new("RequestCount", 1.0, MetricUnit::Count, timestamp));
        if !success {
            data.push(MetricDatum::new("ErrorCount", 1.0, MetricUnit::Count, timestamp));
        }
    }
    data
}

/// Destination for metric data points
pub trait MetricsExporter: Send + Sync {
    fn name(&self) -> &'static str;
    fn export(&self, data: &[MetricDatum]) -> Result<(), SinkError>;
}

// ============================================================================
// EXPORTERS
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct MetricsPayload<'a> {
    namespace: &'a str,
    metric_data: &'a [MetricDatum],
}

/// POSTs `{Namespace, MetricData}` batches to a metrics gateway
pub struct HttpMetricsExporter {
    namespace: String,
    poster: JsonPoster,
}

impl HttpMetricsExporter {
    pub fn new(url: impl Into<String>, namespace: impl Into<String>, timeout: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            poster: JsonPoster::new(url, timeout),
        }
    }
}

impl MetricsExporter for HttpMetricsExporter {
    fn name(&self) -> &'static str {
        "http-metrics"
    }

    fn export(&self, data: &[MetricDatum]) -> Result<(), SinkError> {
        if data.is_empty() {
            return Ok(());
        }
        self.poster.post(&MetricsPayload {
            namespace: &self.namespace,
            metric_data: data,
        })
    }
}

/// One `tracing` event per data point under target `metrics`
pub struct LogMetricsExporter {
    namespace: String,
}

impl LogMetricsExporter {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl MetricsExporter for LogMetricsExporter {
    fn name(&self) -> &'static str {
        "log-metrics"
    }

    fn export(&self, data: &[MetricDatum]) -> Result<(), SinkError> {
        for d in data {
            tracing::info!(
                target: "metrics",
                namespace = %self.namespace,
                metric = %d.metric_name,
                value = d.value,
                unit = ?d.unit,
                "metric"
            );
        }
        Ok(())
    }
}

// ============================================================================
// PUBLISHER
// ============================================================================

#[derive(Clone, Default)]
pub struct MetricsPublisher {
    workers: Arc<Vec<SinkWorker<MetricDatum>>>,
}

impl MetricsPublisher {
    pub fn new(exporters: Vec<Arc<dyn MetricsExporter>>) -> Self {
        Self::with_capacity(exporters, SINK_QUEUE_CAPACITY)
    }

    pub fn with_capacity(exporters: Vec<Arc<dyn MetricsExporter>>, capacity: usize) -> Self {
        let writers = exporters.into_iter().map(|exporter| {
            let name = exporter.name();
            (name, move |data: &[MetricDatum]| exporter.export(data))
        });

        Self {
            workers: Arc::new(spawn_all(writers, capacity)),
        }
    }

    /// Exporters enabled by configuration
    pub fn from_config(config: &Config) -> Self {
        let mut exporters: Vec<Arc<dyn MetricsExporter>> = Vec::new();

        if let Some(url) = &config.metrics_url {
            tracing::info!("Metrics export enabled: http ({}, namespace {})", url, config.metrics_namespace);
            exporters.push(Arc::new(HttpMetricsExporter::new(
                url.clone(),
                config.metrics_namespace.clone(),
                Duration::from_secs(config.sink_timeout_secs),
            )));
        }
        if config.log_metrics {
            tracing::info!("Metrics export enabled: log");
            exporters.push(Arc::new(LogMetricsExporter::new(config.metrics_namespace.clone())));
        }

        Self::new(exporters)
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Publish data points for `count` predictions. Returns how many exporters
    /// accepted them.
    pub fn record_predictions(&self, latency_ms: f64, success: bool, count: usize) -> usize {
        if self.workers.is_empty() || count == 0 {
            return 0;
        }

        let data = Arc::new(prediction_data(latency_ms, success, count, Utc::now()));
        self.workers
            .iter()
            .filter(|worker| worker.submit(Arc::clone(&data)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::mpsc::{channel, Sender};

    struct ChannelExporter {
        seen: Mutex<Sender<Vec<MetricDatum>>>,
    }

    impl MetricsExporter for ChannelExporter {
        fn name(&self) -> &'static str {
            "channel"
        }

        fn export(&self, data: &[MetricDatum]) -> Result<(), SinkError> {
            self.seen.lock().send(data.to_vec()).ok();
            Ok(())
        }
    }

    fn names(data: &[MetricDatum]) -> Vec<&str> {
        data.iter().map(|d| d.metric_name.as_str()).collect()
    }

    #[test]
    fn test_success_data_points() {
        let data = prediction_data(12.5, true, 1, Utc::now());
        assert_eq!(names(&data), vec!["InferenceTime", "RequestTime", "RequestCount"]);
        assert_eq!(data[0].value, 12.5);
        assert_eq!(data[0].unit, MetricUnit::Milliseconds);
        assert_eq!(data[2].value, 1.0);
        assert_eq!(data[2].unit, MetricUnit::Count);
    }

    #[test]
    fn test_failure_adds_error_count() {
        let data = prediction_data(3.0, false, 1, Utc::now());
        assert_eq!(
            names(&data),
            vec!["InferenceTime", "RequestTime", "RequestCount", "ErrorCount"]
        );
    }

    #[test]
    fn test_batch_repeats_per_prediction() {
        let data = prediction_data(1.0, true, 4, Utc::now());
        assert_eq!(data.len(), 12);
        assert_eq!(data.iter().filter(|d| d.metric_name == "RequestCount").count(), 4);
    }

    #[test]
    fn test_datum_wire_format() {
        let datum = MetricDatum::new("ErrorCount", 1.0, MetricUnit::Count, Utc::now());
        let json = serde_json::to_value(&datum).unwrap();
        assert_eq!(json["MetricName"], "ErrorCount");
        assert_eq!(json["Unit"], "Count");
        assert_eq!(json["Value"], 1.0);
    }

    #[test]
    fn test_publisher_forwards_to_exporter() {
        let (tx, rx) = channel();
        let exporter: Arc<dyn MetricsExporter> = Arc::new(ChannelExporter { seen: Mutex::new(tx) });
        let publisher = MetricsPublisher::new(vec![exporter]);

        assert_eq!(publisher.record_predictions(7.0, false, 1), 1);
        let data = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[3].metric_name, "ErrorCount");
    }

    #[test]
    fn test_disabled_publisher_is_noop() {
        let publisher = MetricsPublisher::default();
        assert!(publisher.is_empty());
        assert_eq!(publisher.record_predictions(1.0, true, 1), 0);
    }

    #[test]
    fn test_unreachable_gateway_is_error() {
        let exporter = HttpMetricsExporter::new(
            "http://127.0.0.1:9/metrics",
            "ModelDeployment",
            Duration::from_millis(200),
        );
        let data = prediction_data(1.0, true, 1, Utc::now());
        assert!(matches!(exporter.export(&data), Err(SinkError::Http(_))));
    }
}
