use super::{ProcessProbe, ProcessUsage};
use std::fs;
use std::time::Duration;

pub struct LinuxProbe {
    page_size: u64,
    clock_ticks: u64,
    num_cpus: u32,
}

impl LinuxProbe {
    pub fn new() -> Self {
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) as u64 };
        let clock_ticks = (unsafe { libc::sysconf(libc::_SC_CLK_TCK) as u64 }).max(1);
        let num_cpus = unsafe { libc::sysconf(libc::_SC_NPROCESSORS_ONLN) }.max(1) as u32;
        Self {
            page_size,
            clock_ticks,
            num_cpus,
        }
    }

    fn read_stat(pid: u32) -> Option<String> {
        fs::read_to_string(format!("/proc/{}/stat", pid)).ok()
    }

    /// Splits a /proc/<pid>/stat line at the closing paren of the comm field,
    /// so names containing spaces or parens do not shift field indices.
    /// Returns comm and the whitespace-separated fields after it; field N of
    /// stat(5) lands at index N - 3.
    fn split_stat(content: &str) -> Option<(&str, Vec<&str>)> {
        let open = content.find('(')?;
        let close = content.rfind(')')?;
        let comm = &content[open + 1..close];
        let fields: Vec<&str> = content[close + 1..].split_whitespace().collect();
        Some((comm, fields))
    }

    fn usage_of(&self, pid: u32, name: &str) -> Option<ProcessUsage> {
        let stat = Self::read_stat(pid)?;
        let (comm, fields) = Self::split_stat(&stat)?;
        if comm != name {
            return None;
        }
        let state = fields.first()?.chars().next()?;
        if state == 'Z' {
            return None;
        }
        let rss_pages: u64 = fields.get(21)?.parse().ok()?;
        Some(ProcessUsage {
            pid,
            working_set_bytes: rss_pages * self.page_size,
            private_bytes: Self::rss_anon_bytes(pid).unwrap_or(0),
            open_handles: Self::fd_count(pid),
        })
    }

    /// Anonymous resident memory from /proc/<pid>/status, in bytes.
    /// RssAnon is absent on kernels older than 4.5.
    fn rss_anon_bytes(pid: u32) -> Option<u64> {
        let status = fs::read_to_string(format!("/proc/{}/status", pid)).ok()?;
        for line in status.lines() {
            if let Some(rest) = line.strip_prefix("RssAnon:") {
                let kb: u64 = rest.split_whitespace().next()?.parse().ok()?;
                return Some(kb * 1024);
            }
        }
        None
    }

    fn fd_count(pid: u32) -> u64 {
        fs::read_dir(format!("/proc/{}/fd", pid))
            .map(|entries| entries.count() as u64)
            .unwrap_or(0)
    }
}

impl Default for LinuxProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessProbe for LinuxProbe {
    fn logical_cpus(&self) -> u32 {
        self.num_cpus
    }

    fn cpu_time(&self, pid: u32) -> Option<Duration> {
        let stat = Self::read_stat(pid)?;
        let (_, fields) = Self::split_stat(&stat)?;
        let utime: u64 = fields.get(11)?.parse().ok()?;
        let stime: u64 = fields.get(12)?.parse().ok()?;
        Some(Duration::from_millis((utime + stime) * 1000 / self.clock_ticks))
    }

    fn is_alive(&self, pid: u32) -> bool {
        match Self::read_stat(pid) {
            Some(stat) => Self::split_stat(&stat)
                .and_then(|(_, fields)| fields.first().map(|s| !s.starts_with('Z')))
                .unwrap_or(false),
            None => false,
        }
    }

    fn instances_of(&self, name: &str) -> Vec<ProcessUsage> {
        let mut matches = Vec::new();
        if let Ok(entries) = fs::read_dir("/proc") {
            for entry in entries.flatten() {
                if let Some(file_name) = entry.file_name().to_str() {
                    if let Ok(pid) = file_name.parse::<u32>() {
                        if let Some(usage) = self.usage_of(pid, name) {
                            matches.push(usage);
                        }
                    }
                }
            }
        }
        matches
    }
}
