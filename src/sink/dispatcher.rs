//! Sink Dispatcher - fire-and-forget fan-out to all configured sinks

use std::sync::Arc;
use std::time::Duration;

use super::worker::{spawn_all, SinkWorker, SINK_QUEUE_CAPACITY};
use super::{HttpSink, JsonlSink, LogSink, PredictionRecord, PredictionSink};
use crate::config::Config;

#[derive(Clone, Default)]
pub struct SinkDispatcher {
    workers: Arc<Vec<SinkWorker<PredictionRecord>>>,
}

impl SinkDispatcher {
    pub fn new(sinks: Vec<Arc<dyn PredictionSink>>) -> Self {
        Self::with_capacity(sinks, SINK_QUEUE_CAPACITY)
    }

    /// One worker per sink, each buffering at most `capacity` dispatches
    pub fn with_capacity(sinks: Vec<Arc<dyn PredictionSink>>, capacity: usize) -> Self {
        let writers = sinks.into_iter().map(|sink| {
            let name = sink.name();
            (name, move |records: &[PredictionRecord]| sink.write(records))
        });

        Self {
            workers: Arc::new(spawn_all(writers, capacity)),
        }
    }

    /// Sinks enabled by configuration
    pub fn from_config(config: &Config) -> Self {
        let mut sinks: Vec<Arc<dyn PredictionSink>> = Vec::new();

        if let Some(dir) = &config.sink_dir {
            tracing::info!("Prediction sink enabled: jsonl ({}/{})", dir.display(), config.sink_prefix);
            sinks.push(Arc::new(JsonlSink::new(dir.clone(), config.sink_prefix.clone())));
        }
        if let Some(url) = &config.sink_url {
            tracing::info!("Prediction sink enabled: http ({})", url);
            sinks.push(Arc::new(HttpSink::new(
                url.clone(),
                Duration::from_secs(config.sink_timeout_secs),
            )));
        }
        if config.log_predictions {
            tracing::info!("Prediction sink enabled: log");
            sinks.push(Arc::new(LogSink));
        }

        Self::new(sinks)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Queue records for every sink and return immediately.
    ///
    /// Returns how many sinks accepted the batch; a sink with a full queue
    /// drops it. Write errors are logged by the sink's worker.
    pub fn dispatch(&self, records: Vec<PredictionRecord>) -> usize {
        if self.workers.is_empty() || records.is_empty() {
            return 0;
        }

        let records = Arc::new(records);
        self.workers
            .iter()
            .filter(|worker| worker.submit(Arc::clone(&records)))
            .count()
    }
}
