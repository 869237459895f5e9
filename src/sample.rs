//! One row of collected metrics for a single measurement cycle.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Immutable once constructed. Field order matches the CSV column order:
/// timestamp, cpu%, working set, private memory, open handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sample {
    #[serde(serialize_with = "as_utc_seconds")]
    pub timestamp: DateTime<Utc>,
    pub cpu_percent: u32,
    pub working_set_mb: u64,
    pub private_mb: u64,
    pub open_handles: u64,
}

fn as_utc_seconds<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
}
