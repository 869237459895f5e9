//! Validated run settings assembled from CLI input.

use crate::error::{Error, Result};
use crate::launcher;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest permitted sampling interval, in seconds.
pub const MAX_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub executable: PathBuf,
    pub target_name: String,
    pub interval: Duration,
    pub output: PathBuf,
    pub delimiter: u8,
}

impl Settings {
    /// Validates the collaborator-supplied inputs. The interval must be
    /// positive on entry (the CLI parser already rejects zero) and is clamped
    /// to [`MAX_INTERVAL_SECS`] here so an oversized value never reaches the
    /// sampler.
    pub fn new(
        executable: PathBuf,
        interval_secs: u64,
        output: PathBuf,
        separator: char,
    ) -> Result<Self> {
        if !executable.is_file() {
            return Err(Error::InvalidSettings(format!(
                "executable not found: {}",
                executable.display()
            )));
        }
        if interval_secs == 0 {
            return Err(Error::InvalidSettings(
                "interval must be at least 1 second".into(),
            ));
        }
        if let Some(parent) = parent_dir(&output) {
            if !parent.is_dir() {
                return Err(Error::InvalidSettings(format!(
                    "output directory does not exist: {}",
                    parent.display()
                )));
            }
        }
        if !separator.is_ascii() {
            return Err(Error::InvalidSettings(format!(
                "separator must be a single ASCII character, got {separator:?}"
            )));
        }
        Ok(Self {
            target_name: launcher::process_name(&executable),
            executable,
            interval: Duration::from_secs(interval_secs.min(MAX_INTERVAL_SECS)),
            output,
            delimiter: separator as u8,
        })
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => None,
        other => other,
    }
}
