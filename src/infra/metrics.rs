// ============================================================
// Layer 6 - Metrics Logger
// ============================================================
// Records the average training loss of each epoch to a CSV
// file so learning curves can be plotted after the run.
//
// Output file: checkpoints/metrics.csv
//
//   epoch,train_loss,batches
//   1,5.812300,1720
//   2,4.101950,1720
//
// The file is appended to across runs, which matches resuming
// training from an existing checkpoint.

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Mean sparse cross-entropy over all training batches
    pub train_loss: f64,

    /// Number of batches the mean was taken over
    pub batches: usize,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, batches: usize) -> Self {
        Self { epoch, train_loss, batches }
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the logger, writing the CSV header if the file is new.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "epoch,train_loss,batches")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        writeln!(f, "{},{:.6},{}", m.epoch, m.train_loss, m.batches)?;

        tracing::debug!("Logged epoch {} metrics: train_loss={:.4}", m.epoch, m.train_loss);
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
