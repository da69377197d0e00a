//! JSONL Sink - date/hour partitioned prediction files
//!
//! Layout: `<base>/<prefix>/YYYY/MM/DD/HH/<kind>_<YYYYmmdd_HHMMSS_ffffff>_<id>.jsonl`,
//! one file per dispatch. The partition scheme matches what Athena-style
//! engines expect for `date`/`hour` pruning.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{PredictionRecord, PredictionSink, SinkError};

/// Log file extension
const LOG_EXT: &str = ".jsonl";

pub struct JsonlSink {
    base_dir: PathBuf,
    prefix: String,
}

impl JsonlSink {
    pub fn new(base_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            prefix: prefix.into(),
        }
    }

    /// Target file for a dispatch of `count` records at `now`
    pub fn object_path(&self, count: usize, now: DateTime<Utc>) -> PathBuf {
        let kind = if count == 1 { "prediction" } else { "batch_predictions" };
        let short_id = Uuid::new_v4().simple().to_string();
        let filename = format!(
            "{}_{}_{}{}",
            kind,
            now.format("%Y%m%d_%H%M%S_%6f"),
            &short_id[..8],
            LOG_EXT
        );

        self.base_dir
            .join(&self.prefix)
            .join(now.format("%Y").to_string())
            .join(now.format("%m").to_string())
            .join(now.format("%d").to_string())
            .join(now.format("%H").to_string())
            .join(filename)
    }
}

impl PredictionSink for JsonlSink {
    fn name(&self) -> &'static str {
        "jsonl"
    }

    fn write(&self, records: &[PredictionRecord]) -> Result<(), SinkError> {
        if records.is_empty() {
            tracing::debug!("Empty prediction batch, skipping save");
            return Ok(());
        }

        let path = self.object_path(records.len(), Utc::now());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        tracing::info!("Saved {} predictions to {}", records.len(), path.display());
        Ok(())
    }
}
