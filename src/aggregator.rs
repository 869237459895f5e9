//! Sums memory and handle usage across same-named process instances.

use crate::probe::ProcessProbe;

const BYTES_PER_MB: u64 = 1_048_576;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceTotals {
    pub working_set_mb: u64,
    pub private_mb: u64,
    pub open_handles: u64,
}

/// Sums working set, private bytes and handle counts over every live process
/// running under `name`, truncating byte totals to whole megabytes. Matching
/// is by process name, not executable path: the target may spawn same-named
/// children or restart under the same name. Zero matches is a valid result
/// with all-zero totals, since the monitored instance may exit between the
/// liveness check and enumeration.
pub fn collect(probe: &dyn ProcessProbe, name: &str) -> ResourceTotals {
    let mut working_set_bytes = 0u64;
    let mut private_bytes = 0u64;
    let mut open_handles = 0u64;
    for usage in probe.instances_of(name) {
        working_set_bytes += usage.working_set_bytes;
        private_bytes += usage.private_bytes;
        open_handles += usage.open_handles;
    }
    ResourceTotals {
        working_set_mb: working_set_bytes / BYTES_PER_MB,
        private_mb: private_bytes / BYTES_PER_MB,
        open_handles,
    }
}
