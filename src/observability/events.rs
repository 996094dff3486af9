//! Lifecycle events of a load session
//!
//! Events are explicit and typed; their string form is the `event` field of
//! the log line.

use std::fmt;

/// Observable events during a load or read session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded and validated
    ConfigLoaded,

    // Dictionary
    /// Dictionary parsed into a schema
    DictionaryLoaded,

    // Store
    /// Store connection opened
    StoreOpened,
    /// Store file removed for a reset load
    StoreReset,
    /// Store connection closed
    StoreClosed,

    // Table
    /// Table created from the schema
    TableCreated,
    /// Existing table reused for appending
    TableReused,

    // Source files
    /// Source file opened
    FileStart,
    /// Source file fully read
    FileComplete,
    /// Source file skipped after an error
    FileSkipped,

    // Batches
    /// Batch committed
    BatchCommitted,
    /// Batch commit failed (FATAL)
    BatchFailed,

    // Session
    /// Test-mode row cap reached, load stopped
    TestModeCapReached,
    /// Load finished
    LoadComplete,
    /// Load aborted (FATAL)
    LoadAborted,

    // Read side
    /// Sample query executed
    SampleExecuted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DictionaryLoaded => "DICTIONARY_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::StoreReset => "STORE_RESET",
            Event::StoreClosed => "STORE_CLOSED",
            Event::TableCreated => "TABLE_CREATED",
            Event::TableReused => "TABLE_REUSED",
            Event::FileStart => "FILE_LOAD_BEGIN",
            Event::FileComplete => "FILE_LOAD_COMPLETE",
            Event::FileSkipped => "FILE_LOAD_SKIPPED",
            Event::BatchCommitted => "BATCH_COMMITTED",
            Event::BatchFailed => "BATCH_FAILED",
            Event::TestModeCapReached => "TEST_MODE_CAP_REACHED",
            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadAborted => "LOAD_ABORTED",
            Event::SampleExecuted => "SAMPLE_EXECUTED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::BatchFailed | Event::LoadAborted)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
