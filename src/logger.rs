//! Append-only CSV sink with a read-only guard toggled around each write.

use crate::error::Result;
use crate::sample::Sample;
use csv::WriterBuilder;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Column order is fixed. The separator is configurable because locale list
/// separators are not portable.
const HEADER: [&str; 5] = [
    "Timestamp (UTC)",
    "CPU Usage (%)",
    "Physical Memory (MB)",
    "Private Memory (MB)",
    "Open Handles",
];

/// Outcome of one append, as seen by the heartbeat loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Row persisted, keep sampling.
    Continue,
    /// Transient failure, the sink still exists. The failed sample is
    /// discarded; the next cycle writes a fresh one.
    Pause,
    /// The sink is gone. Not retried.
    Fatal,
}

pub struct SampleLog {
    path: PathBuf,
    delimiter: u8,
}

impl SampleLog {
    /// Creates the sink with its header row and leaves it read-only. A
    /// leftover sink from a previous run is unprotected first so it can be
    /// truncated.
    pub fn create(path: &Path, delimiter: u8) -> Result<Self> {
        if path.exists() {
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_readonly(false);
            fs::set_permissions(path, perms)?;
        }
        let file = File::create(path)?;
        let mut writer = WriterBuilder::new().delimiter(delimiter).from_writer(file);
        writer.write_record(HEADER)?;
        writer.flush()?;
        drop(writer);
        let log = Self {
            path: path.to_path_buf(),
            delimiter,
        };
        log.set_readonly(true)?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one sample, classifying any failure. The read-only guard is
    /// restored on the failure path too. The guard deters accidental external
    /// edits between writes; it is not a locking mechanism and offers no
    /// protection against concurrent writers.
    pub fn append(&mut self, sample: &Sample) -> WriteOutcome {
        match self.try_append(sample) {
            Ok(()) => WriteOutcome::Continue,
            Err(err) if self.path.exists() => {
                warn!(
                    path = %self.path.display(),
                    %err,
                    "sample not written, sink temporarily unavailable"
                );
                WriteOutcome::Pause
            }
            Err(err) => {
                error!(path = %self.path.display(), %err, "sink no longer exists, stopping");
                WriteOutcome::Fatal
            }
        }
    }

    fn try_append(&self, sample: &Sample) -> Result<()> {
        self.set_readonly(false)?;
        let written = self.write_row(sample);
        let restored = self.set_readonly(true);
        written?;
        restored
    }

    fn write_row(&self, sample: &Sample) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(false)
            .from_writer(file);
        writer.serialize(sample)?;
        writer.flush()?;
        Ok(())
    }

    fn set_readonly(&self, readonly: bool) -> Result<()> {
        let mut perms = fs::metadata(&self.path)?.permissions();
        perms.set_readonly(readonly);
        fs::set_permissions(&self.path, perms)?;
        Ok(())
    }
}
