use chrono::{TimeZone, Utc};
use procpulse::logger::{SampleLog, WriteOutcome};
use procpulse::sample::Sample;
use std::fs;
use tempfile::tempdir;

fn sample(cpu: u32) -> Sample {
    Sample {
        timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap(),
        cpu_percent: cpu,
        working_set_mb: 45,
        private_mb: 30,
        open_handles: 112,
    }
}

#[test]
fn create_writes_header_and_protects_sink() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let _log = SampleLog::create(&path, b',').unwrap();
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Timestamp (UTC),CPU Usage (%),Physical Memory (MB),Private Memory (MB),Open Handles\n"
    );
    assert!(fs::metadata(&path).unwrap().permissions().readonly());
}

#[test]
fn create_replaces_leftover_protected_sink() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    {
        let mut log = SampleLog::create(&path, b',').unwrap();
        assert_eq!(log.append(&sample(9)), WriteOutcome::Continue);
    }
    let log = SampleLog::create(&path, b',').unwrap();
    let content = fs::read_to_string(log.path()).unwrap();
    assert_eq!(content.lines().count(), 1, "previous rows were truncated");
}

#[test]
fn append_writes_row_and_restores_guard() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let mut log = SampleLog::create(&path, b',').unwrap();
    assert_eq!(log.append(&sample(3)), WriteOutcome::Continue);
    let content = fs::read_to_string(&path).unwrap();
    let row = content.lines().nth(1).unwrap();
    assert_eq!(row, "2024-01-01T00:00:05Z,3,45,30,112");
    assert!(fs::metadata(&path).unwrap().permissions().readonly());
}

#[test]
fn custom_separator_is_used() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let mut log = SampleLog::create(&path, b';').unwrap();
    assert_eq!(log.append(&sample(7)), WriteOutcome::Continue);
    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().contains(';'));
    assert_eq!(lines.next().unwrap(), "2024-01-01T00:00:05Z;7;45;30;112");
}

#[test]
fn successive_appends_accumulate_rows() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let mut log = SampleLog::create(&path, b',').unwrap();
    for cpu in [1, 2, 3] {
        assert_eq!(log.append(&sample(cpu)), WriteOutcome::Continue);
    }
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
}

#[test]
fn missing_sink_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let mut log = SampleLog::create(&path, b',').unwrap();
    fs::remove_file(&path).unwrap();
    assert_eq!(log.append(&sample(1)), WriteOutcome::Fatal);
}

#[test]
fn transient_failure_pauses_then_recovers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("metrics.csv");
    let mut log = SampleLog::create(&path, b',').unwrap();
    assert_eq!(log.append(&sample(1)), WriteOutcome::Continue);
    let saved = fs::read_to_string(&path).unwrap();

    // Make the sink path temporarily unusable for one cycle by swapping a
    // directory in at its location.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    assert_eq!(log.append(&sample(2)), WriteOutcome::Pause);
    fs::remove_dir(&path).unwrap();
    fs::write(&path, &saved).unwrap();

    assert_eq!(log.append(&sample(3)), WriteOutcome::Continue);
    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("2024-01-01T00:00:05Z,1,"));
    assert!(content.contains("2024-01-01T00:00:05Z,3,"));
    // the paused cycle's sample was discarded, not queued
    assert!(!content.contains("2024-01-01T00:00:05Z,2,"));
    assert!(fs::metadata(&path).unwrap().permissions().readonly());
}
