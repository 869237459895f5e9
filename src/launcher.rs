//! Target process startup: pre-launch sweep of same-named instances, then
//! spawn.

use crate::error::Error;
use crate::probe::ProcessProbe;
use std::path::Path;
use std::process::{Child, Command};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// The kernel truncates comm to 15 bytes, so enumeration matches on the
/// truncated executable file name.
pub const COMM_MAX: usize = 15;

const SETTLE_DELAY: Duration = Duration::from_millis(500);

/// Process name the target will be visible under: its file name, truncated to
/// the comm limit.
pub fn process_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .chars()
        .take(COMM_MAX)
        .collect()
}

/// Terminates every process already running under `name`, then waits a short
/// settling delay, so the launch observes a clean single instance. Returns
/// how many were signalled.
pub fn sweep_existing(probe: &dyn ProcessProbe, name: &str) -> usize {
    let stale = probe.instances_of(name);
    for usage in &stale {
        warn!(pid = usage.pid, name, "terminating pre-existing instance");
        let rc = unsafe { libc::kill(usage.pid as i32, libc::SIGTERM) };
        if rc != 0 {
            warn!(pid = usage.pid, "failed to signal process");
        }
    }
    if !stale.is_empty() {
        thread::sleep(SETTLE_DELAY);
    }
    stale.len()
}

/// Spawns the target executable with inherited stdio.
pub fn launch(path: &Path) -> Result<Child, Error> {
    let child = Command::new(path).spawn().map_err(|source| Error::Spawn {
        path: path.to_path_buf(),
        source,
    })?;
    info!(pid = child.id(), path = %path.display(), "target launched");
    Ok(child)
}
