//! Point-in-time metrics views
//!
//! `MetricsSnapshot` is the raw copy, `MetricsSummary` holds derived
//! statistics at full precision and `MetricsReport` is the rounded form the
//! HTTP surface serves.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Raw aggregator state at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_predictions: u64,
    pub total_errors: u64,
    /// Time since the aggregator was created or last reset
    pub elapsed: Duration,
    /// Successful-prediction latencies, oldest first
    pub latencies_ms: Vec<f64>,
}

/// Derived statistics, unrounded
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub total_predictions: u64,
    pub total_errors: u64,
    pub avg_inference_time_ms: f64,
    pub p95_inference_time_ms: f64,
    pub p99_inference_time_ms: f64,
    pub error_rate: f64,
    pub requests_per_second: f64,
}

impl MetricsSnapshot {
    pub fn summary(&self) -> MetricsSummary {
        let mut sorted = self.latencies_ms.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        };

        MetricsSummary {
            total_requests: self.total_requests,
            total_predictions: self.total_predictions,
            total_errors: self.total_errors,
            avg_inference_time_ms: avg,
            p95_inference_time_ms: percentile(&sorted, 0.95),
            p99_inference_time_ms: percentile(&sorted, 0.99),
            error_rate: ratio(self.total_errors as f64, self.total_predictions as f64),
            requests_per_second: ratio(self.total_requests as f64, self.elapsed.as_secs_f64()),
        }
    }
}

/// Nearest-rank on a sorted slice: `sorted[floor(n * q)]`, no interpolation.
/// Biased for small `n`; kept as-is so dashboards stay comparable.
pub fn percentile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let index = ((sorted.len() as f64 * q).floor() as usize).min(sorted.len() - 1);
    sorted[index]
}

/// Division where an empty denominator yields 0.0
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

// ============================================================================
// PRESENTATION
// ============================================================================

/// Rounded metrics as served by `GET /metrics`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub total_requests: u64,
    pub total_predictions: u64,
    pub total_errors: u64,
    pub avg_inference_time_ms: f64,
    pub p95_inference_time_ms: f64,
    pub p99_inference_time_ms: f64,
    pub error_rate: f64,
    pub requests_per_second: f64,
}

impl From<&MetricsSummary> for MetricsReport {
    fn from(summary: &MetricsSummary) -> Self {
        Self {
            total_requests: summary.total_requests,
            total_predictions: summary.total_predictions,
            total_errors: summary.total_errors,
            avg_inference_time_ms: round_to(summary.avg_inference_time_ms, 3),
            p95_inference_time_ms: round_to(summary.p95_inference_time_ms, 3),
            p99_inference_time_ms: round_to(summary.p99_inference_time_ms, 3),
            error_rate: round_to(summary.error_rate, 4),
            requests_per_second: round_to(summary.requests_per_second, 2),
        }
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
