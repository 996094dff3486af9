//! ObservationScope for automatic begin/complete logging
//!
//! - Logs `{name}_BEGIN` on creation
//! - Logs `{name}_COMPLETE` on `complete()`
//! - Logs `{name}_FAILED` on `fail()`
//! - Logs `{name}_INCOMPLETE` on drop if neither was called

use std::time::{Duration, Instant};

use tracing::{error, info, warn};

/// A scope that logs its start, its outcome and its duration
///
/// ```ignore
/// let scope = ObservationScope::new("DICTIONARY_PARSE");
/// // ... do work ...
/// scope.complete(); // logs DICTIONARY_PARSE_COMPLETE
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    subject: String,
    timer: Timer,
    completed: bool,
}

impl<'a> ObservationScope<'a> {
    /// Create a new observation scope
    pub fn new(name: &'a str) -> Self {
        Self::with_subject(name, "")
    }

    /// Create a scope about a named subject (file, table, ...)
    pub fn with_subject(name: &'a str, subject: impl Into<String>) -> Self {
        let subject = subject.into();
        info!(event = %format!("{}_BEGIN", name), subject = %subject);

        Self {
            name,
            subject,
            timer: Timer::new(),
            completed: false,
        }
    }

    /// Mark the scope as successfully completed
    pub fn complete(mut self) {
        self.completed = true;
        info!(
            event = %format!("{}_COMPLETE", self.name),
            subject = %self.subject,
            elapsed_ms = self.timer.elapsed_ms(),
        );
    }

    /// Mark the scope as completed, reporting a row count
    pub fn complete_with_rows(mut self, rows: u64) {
        self.completed = true;
        info!(
            event = %format!("{}_COMPLETE", self.name),
            subject = %self.subject,
            rows,
            elapsed_ms = self.timer.elapsed_ms(),
        );
    }

    /// Mark the scope as failed with a reason
    pub fn fail(mut self, reason: &str) {
        self.completed = true;
        error!(
            event = %format!("{}_FAILED", self.name),
            subject = %self.subject,
            reason,
        );
    }

    /// Time spent in the scope so far
    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.completed {
            warn!(
                event = %format!("{}_INCOMPLETE", self.name),
                subject = %self.subject,
                reason = "scope dropped without completion",
            );
        }
    }
}

/// A simple duration timer
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
