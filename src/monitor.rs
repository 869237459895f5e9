//! Heartbeat loop: sample, aggregate, append, repeat until the target exits
//! or the sink is lost.

use crate::aggregator;
use crate::logger::{SampleLog, WriteOutcome};
use crate::probe::ProcessProbe;
use crate::sample::Sample;
use crate::sampler;
use chrono::Utc;
use std::time::Duration;
use tracing::{debug, info};

/// Why the loop reached its terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetExited,
    SinkLost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reason: StopReason,
    pub samples_written: u64,
    pub samples_skipped: u64,
}

/// Drives the sampling cycle for `pid` until the process exits or a fatal
/// write error occurs. Liveness is checked at the top of each cycle, before
/// sampling. The interval-long sleep inside `sampler::measure_cpu` is the
/// sole pacing; cycles are otherwise scheduled back to back.
pub fn run(
    probe: &dyn ProcessProbe,
    pid: u32,
    name: &str,
    interval: Duration,
    log: &mut SampleLog,
) -> RunSummary {
    let mut samples_written = 0;
    let mut samples_skipped = 0;
    loop {
        if !probe.is_alive(pid) {
            info!(pid, "monitored process exited");
            return RunSummary {
                reason: StopReason::TargetExited,
                samples_written,
                samples_skipped,
            };
        }
        let cpu_percent = sampler::measure_cpu(probe, pid, interval);
        let totals = aggregator::collect(probe, name);
        let sample = Sample {
            timestamp: Utc::now(),
            cpu_percent,
            working_set_mb: totals.working_set_mb,
            private_mb: totals.private_mb,
            open_handles: totals.open_handles,
        };
        match log.append(&sample) {
            WriteOutcome::Continue => {
                samples_written += 1;
                debug!(
                    cpu_percent,
                    working_set_mb = sample.working_set_mb,
                    private_mb = sample.private_mb,
                    open_handles = sample.open_handles,
                    "sample written"
                );
            }
            WriteOutcome::Pause => {
                samples_skipped += 1;
            }
            WriteOutcome::Fatal => {
                return RunSummary {
                    reason: StopReason::SinkLost,
                    samples_written,
                    samples_skipped,
                };
            }
        }
    }
}
