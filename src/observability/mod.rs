//! Observability subsystem
//!
//! - Structured logging through `tracing` (text or JSON lines)
//! - Typed lifecycle events
//! - Per-session counters
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on loading
//! 3. Logs go to stderr; stdout carries command output only
//!
//! # Usage
//!
//! ```ignore
//! use seerload::observability::{log_event, Event, ObservationScope};
//!
//! log_event(Event::DictionaryLoaded, &[("fields", "133")]);
//!
//! let scope = ObservationScope::with_subject("FILE_LOAD", "breast.txt");
//! // ... do work ...
//! scope.complete_with_rows(1_000);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{default_directive, init_logging, LogFormat};
pub use metrics::{LoadMetrics, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

/// Log a lifecycle event with string fields.
///
/// Fatal events are logged at ERROR, everything else at INFO.
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let rendered = render_fields(fields);
    if event.is_fatal() {
        tracing::error!(event = event.as_str(), fields = %rendered);
    } else {
        tracing::info!(event = event.as_str(), fields = %rendered);
    }
}

/// Renders `key=value` pairs in key order so output is deterministic.
fn render_fields(fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}
