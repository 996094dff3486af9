//! Counters for one load session
//!
//! - Counters only, monotonic
//! - Reset only when a new session starts

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters of a load session
#[derive(Debug, Default)]
pub struct LoadMetrics {
    rows_decoded: AtomicU64,
    short_lines: AtomicU64,
    rows_committed: AtomicU64,
    batches_committed: AtomicU64,
    files_loaded: AtomicU64,
    files_skipped: AtomicU64,
}

impl LoadMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_rows_decoded(&self) {
        self.rows_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Line shorter than the record width (decoded with truncated values)
    pub fn increment_short_lines(&self) {
        self.short_lines.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self, rows: u64) {
        self.batches_committed.fetch_add(1, Ordering::Relaxed);
        self.rows_committed.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn increment_files_loaded(&self) {
        self.files_loaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_files_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rows_decoded(&self) -> u64 {
        self.rows_decoded.load(Ordering::Relaxed)
    }

    pub fn rows_committed(&self) -> u64 {
        self.rows_committed.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            rows_decoded: self.rows_decoded.load(Ordering::Relaxed),
            short_lines: self.short_lines.load(Ordering::Relaxed),
            rows_committed: self.rows_committed.load(Ordering::Relaxed),
            batches_committed: self.batches_committed.load(Ordering::Relaxed),
            files_loaded: self.files_loaded.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetricsSnapshot {
    pub rows_decoded: u64,
    pub short_lines: u64,
    pub rows_committed: u64,
    pub batches_committed: u64,
    pub files_loaded: u64,
    pub files_skipped: u64,
}
