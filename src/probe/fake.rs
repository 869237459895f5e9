//! Scripted probe used in tests to drive the loop without real processes.

use super::{ProcessProbe, ProcessUsage};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

pub struct FakeProbe {
    cpus: u32,
    cpu_times: Mutex<VecDeque<Option<Duration>>>,
    alive_cycles: Mutex<u32>,
    instances: Mutex<Vec<ProcessUsage>>,
}

impl FakeProbe {
    pub fn new(cpus: u32) -> Self {
        Self {
            cpus,
            cpu_times: Mutex::new(VecDeque::new()),
            alive_cycles: Mutex::new(0),
            instances: Mutex::new(Vec::new()),
        }
    }

    /// Queues the readings `cpu_time` hands out, in order. Once the script is
    /// exhausted the probe reports the process as gone.
    pub fn script_cpu_times(self, readings: Vec<Option<Duration>>) -> Self {
        *self.cpu_times.lock().unwrap() = readings.into();
        self
    }

    /// `is_alive` answers true this many times, then false forever.
    pub fn alive_for(self, cycles: u32) -> Self {
        *self.alive_cycles.lock().unwrap() = cycles;
        self
    }

    pub fn with_instances(self, instances: Vec<ProcessUsage>) -> Self {
        *self.instances.lock().unwrap() = instances;
        self
    }
}

impl ProcessProbe for FakeProbe {
    fn logical_cpus(&self) -> u32 {
        self.cpus
    }

    fn cpu_time(&self, _pid: u32) -> Option<Duration> {
        self.cpu_times.lock().unwrap().pop_front().flatten()
    }

    fn is_alive(&self, _pid: u32) -> bool {
        let mut cycles = self.alive_cycles.lock().unwrap();
        if *cycles == 0 {
            return false;
        }
        *cycles -= 1;
        true
    }

    fn instances_of(&self, _name: &str) -> Vec<ProcessUsage> {
        self.instances.lock().unwrap().clone()
    }
}
