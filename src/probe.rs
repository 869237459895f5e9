//! Process probe abstraction (real implementation reads /proc on Linux)

pub mod fake;
pub mod linux;

pub use fake::FakeProbe;
pub use linux::LinuxProbe;

use std::time::Duration;

/// Per-process usage figures returned by enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessUsage {
    pub pid: u32,
    pub working_set_bytes: u64,
    pub private_bytes: u64,
    pub open_handles: u64,
}

pub trait ProcessProbe: Send + Sync {
    /// Number of logical processors, at least 1.
    fn logical_cpus(&self) -> u32;

    /// Cumulative processor time consumed by the process since it started,
    /// or `None` once it is gone.
    fn cpu_time(&self, pid: u32) -> Option<Duration>;

    /// Whether the process exists and is not a zombie.
    fn is_alive(&self, pid: u32) -> bool;

    /// Every live process running under `name`, with its memory and handle
    /// usage.
    fn instances_of(&self, name: &str) -> Vec<ProcessUsage>;
}
