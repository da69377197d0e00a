//! Metrics Module - in-process serving statistics

pub mod aggregator;
pub mod snapshot;

pub use aggregator::{MetricsAggregator, LATENCY_WINDOW_CAPACITY};
pub use snapshot::{MetricsReport, MetricsSnapshot, MetricsSummary};
