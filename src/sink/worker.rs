//! Sink Worker - one background thread per sink behind a bounded queue
//!
//! The serving path only ever calls `submit`, which never blocks. A slow
//! destination fills its own queue and further batches are dropped with a
//! warning; other sinks and the tokio blocking pool are unaffected.

use std::sync::Arc;

use tokio::sync::mpsc::{self, error::TrySendError};

use super::SinkError;

/// Batches buffered per sink before new ones are dropped
pub const SINK_QUEUE_CAPACITY: usize = 256;

pub struct SinkWorker<T> {
    name: &'static str,
    tx: mpsc::Sender<Arc<Vec<T>>>,
}

impl<T: Send + Sync + 'static> SinkWorker<T> {
    /// Start the worker thread. It exits once every handle to the worker is
    /// dropped and the queue is drained.
    pub fn spawn<F>(name: &'static str, capacity: usize, mut write: F) -> std::io::Result<Self>
    where
        F: FnMut(&[T]) -> Result<(), SinkError> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<Arc<Vec<T>>>(capacity.max(1));

        std::thread::Builder::new()
            .name(format!("sink-{}", name))
            .spawn(move || {
                while let Some(batch) = rx.blocking_recv() {
                    if let Err(e) = write(&batch) {
                        tracing::warn!("Sink `{}` failed: {}", name, e);
                    }
                }
                tracing::debug!("Sink `{}` worker stopped", name);
            })?;

        Ok(Self { name, tx })
    }

    /// Queue a batch without waiting. `false` when the batch was dropped.
    pub fn submit(&self, batch: Arc<Vec<T>>) -> bool {
        match self.tx.try_send(batch) {
            Ok(()) => true,
            Err(TrySendError::Full(batch)) => {
                tracing::warn!("Sink `{}` queue full, dropping {} entries", self.name, batch.len());
                false
            }
            Err(TrySendError::Closed(batch)) => {
                tracing::warn!("Sink `{}` worker stopped, dropping {} entries", self.name, batch.len());
                false
            }
        }
    }
}

/// Start one worker per named writer, logging (and skipping) any that fail to spawn
pub fn spawn_all<T, F, I>(writers: I, capacity: usize) -> Vec<SinkWorker<T>>
where
    T: Send + Sync + 'static,
    F: FnMut(&[T]) -> Result<(), SinkError> + Send + 'static,
    I: IntoIterator<Item = (&'static str, F)>,
{
    writers
        .into_iter()
        .filter_map(|(name, write)| match SinkWorker::spawn(name, capacity, write) {
            Ok(worker) => Some(worker),
            Err(e) => {
                tracing::error!("Failed to start sink `{}`: {}", name, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc as std_mpsc;
    use std::time::Duration;

    #[test]
    fn test_batches_reach_writer_in_order() {
        let (seen_tx, seen_rx) = std_mpsc::channel();
        let worker = SinkWorker::spawn("ordered", 8, move |batch: &[u32]| {
            seen_tx.send(batch.to_vec()).ok();
            Ok(())
        })
        .unwrap();

        assert!(worker.submit(Arc::new(vec![1, 2])));
        assert!(worker.submit(Arc::new(vec![3])));

        let timeout = Duration::from_secs(5);
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), vec![1, 2]);
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), vec![3]);
    }

    #[test]
    fn test_writer_error_keeps_worker_alive() {
        let (seen_tx, seen_rx) = std_mpsc::channel();
        let worker = SinkWorker::spawn("flaky", 8, move |batch: &[u32]| {
            seen_tx.send(batch[0]).ok();
            if batch[0] == 1 {
                Err(SinkError::Http("boom".to_string()))
            } else {
                Ok(())
            }
        })
        .unwrap();

        worker.submit(Arc::new(vec![1]));
        worker.submit(Arc::new(vec![2]));

        let timeout = Duration::from_secs(5);
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), 1);
        assert_eq!(seen_rx.recv_timeout(timeout).unwrap(), 2);
    }
}
