//! Interval CPU measurement by processor-time delta.

use crate::probe::ProcessProbe;
use std::thread;
use std::time::{Duration, Instant};

/// Measures CPU utilization of `pid` over one interval of wall-clock sleep.
///
/// The sleep here is the only intentional suspension point in the program and
/// is what paces the whole sampling loop. The result is whole percent,
/// normalized by logical processor count. A process that vanishes mid-interval
/// reads as a zero delta rather than an error.
pub fn measure_cpu(probe: &dyn ProcessProbe, pid: u32, interval: Duration) -> u32 {
    let before = probe.cpu_time(pid).unwrap_or_default();
    let start = Instant::now();
    thread::sleep(interval);
    let after = probe.cpu_time(pid).unwrap_or(before);
    // Clamped to 1ms so a clock anomaly cannot divide by zero.
    let elapsed_ms = start.elapsed().as_millis().max(1);
    let busy_ms = after.saturating_sub(before).as_millis();
    let cores = probe.logical_cpus().max(1) as u128;
    (100 * busy_ms / (cores * elapsed_ms)) as u32
}
