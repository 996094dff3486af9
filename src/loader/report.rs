//! Outcome of a load session

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Per-file result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: String,
    /// Provenance value written to the SOURCE column
    pub source: String,
    pub rows: u64,
    pub short_lines: u64,
}

/// A file left out under the `skip` error policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: String,
    /// Rows read before the failure; they stay in the load
    pub rows_read: u64,
    pub error: String,
}

/// Summary of a finished load
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub session_id: Uuid,
    pub table: String,
    pub store: String,
    pub started_at: DateTime<Utc>,
    pub files: Vec<FileReport>,
    pub skipped: Vec<SkippedFile>,
    pub total_rows: u64,
    pub rows_committed: u64,
    pub batches: u64,
    pub short_lines: u64,
    pub elapsed_secs: f64,
    pub rows_per_sec: f64,
    /// Test mode stopped the load before all input was read
    pub stopped_early: bool,
}

/// Rows per second, zero when no time elapsed.
pub fn throughput(rows: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        rows as f64 / secs
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        assert_eq!(throughput(5000, Duration::from_secs(2)), 2500.0);
        assert_eq!(throughput(5000, Duration::ZERO), 0.0);
    }

    #[test]
    fn test_report_serializes() {
        let report = LoadReport {
            session_id: Uuid::nil(),
            table: "seer".into(),
            store: "/data/seer.db".into(),
            started_at: Utc::now(),
            files: vec![FileReport {
                path: "/data/breast.txt".into(),
                source: "breast".into(),
                rows: 3,
                short_lines: 0,
            }],
            skipped: vec![],
            total_rows: 3,
            rows_committed: 3,
            batches: 1,
            short_lines: 0,
            elapsed_secs: 0.5,
            rows_per_sec: 6.0,
            stopped_early: false,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["table"], "seer");
        assert_eq!(value["files"][0]["source"], "breast");
        assert_eq!(value["total_rows"], 3);
    }
}
