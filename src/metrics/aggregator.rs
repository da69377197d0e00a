//! Metrics Aggregator - request/prediction counters and latency window
//!
//! One instance per process, shared through `AppState`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;

use super::snapshot::MetricsSnapshot;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Keep the last 10k successful inference latencies
pub const LATENCY_WINDOW_CAPACITY: usize = 10_000;

// ============================================================================
// STATE
// ============================================================================

/// Prediction-side state. Counts and window change together under one lock
/// so a snapshot never pairs a count with a different window version.
struct PredictionState {
    total_predictions: u64,
    total_errors: u64,
    latencies_ms: VecDeque<f64>,
    started_at: Instant,
}

impl PredictionState {
    fn new() -> Self {
        Self {
            total_predictions: 0,
            total_errors: 0,
            latencies_ms: VecDeque::with_capacity(LATENCY_WINDOW_CAPACITY),
            started_at: Instant::now(),
        }
    }
}

pub struct MetricsAggregator {
    total_requests: AtomicU64,
    state: Mutex<PredictionState>,
    capacity: usize,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::with_capacity(LATENCY_WINDOW_CAPACITY)
    }

    /// Aggregator with a custom latency window size (min 1)
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            state: Mutex::new(PredictionState::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one prediction outcome.
    ///
    /// Failed predictions count as errors and never enter the latency window.
    pub fn record_prediction(&self, latency_ms: f64, success: bool) {
        let mut state = self.state.lock();
        state.total_predictions += 1;

        if success {
            if state.latencies_ms.len() >= self.capacity {
                state.latencies_ms.pop_front();
            }
            state.latencies_ms.push_back(latency_ms);
        } else {
            state.total_errors += 1;
        }
    }

    /// Consistent copy of the current state. Derived statistics are computed
    /// on the copy, outside the lock.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.state.lock();
        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            total_predictions: state.total_predictions,
            total_errors: state.total_errors,
            elapsed: state.started_at.elapsed(),
            latencies_ms: state.latencies_ms.iter().copied().collect(),
        }
    }

    /// Zero all counters, clear the window and restart the clock
    pub fn reset(&self) {
        let mut state = self.state.lock();
        *state = PredictionState::new();
        self.total_requests.store(0, Ordering::Relaxed);
        tracing::info!("Metrics reset");
    }
}

impl Default for MetricsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
