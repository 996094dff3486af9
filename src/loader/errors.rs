//! Load session errors
//!
//! `LoadError` is the error of a whole load. Every variant knows the stage
//! it failed in, so the operator sees where the load stopped, and its
//! category:
//!
//! - Configuration: bad options, empty dictionary, no matching files
//! - Io: dictionary/data file unreadable, store file locked or undeletable
//! - Schema: table exists without reset, invalid or duplicate column names
//! - BatchCommit: store failure while committing a batch
//!
//! All of them abort the load. Tables from an aborted load are left in place.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dictionary::DictionaryError;
use crate::schema::SchemaError;
use crate::storage::StoreError;

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Stage of the pipeline an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    Configuration,
    StoreInit,
    DictionaryParse,
    TableCreation,
    SourceResolution,
    FileOpen,
    FileRead,
    BatchCommit,
    StoreClose,
}

impl LoadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStage::Configuration => "configuration",
            LoadStage::StoreInit => "store initialization",
            LoadStage::DictionaryParse => "dictionary parse",
            LoadStage::TableCreation => "table creation",
            LoadStage::SourceResolution => "source resolution",
            LoadStage::FileOpen => "file open",
            LoadStage::FileRead => "file read",
            LoadStage::BatchCommit => "batch commit",
            LoadStage::StoreClose => "store close",
        }
    }
}

impl fmt::Display for LoadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy of a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
    Schema,
    BatchCommit,
}

/// Load session errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// Invalid option value
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Dictionary(#[from] DictionaryError),

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    StoreInit(#[source] StoreError),

    #[error("{0}")]
    StoreClose(#[source] StoreError),

    /// Data pattern matched no file
    #[error("no data files match '{pattern}' in {dir}")]
    NoSources { pattern: String, dir: PathBuf },

    /// Directory holding the data files could not be listed
    #[error("failed to list {dir}: {source}")]
    SourceScan {
        dir: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path} at line {line}: {source}")]
    FileRead {
        path: PathBuf,
        line: u64,
        #[source]
        source: io::Error,
    },

    /// Batch rolled back; rows `first_row..=last_row` of this load were not stored
    #[error("rows {first_row}..={last_row} from [{sources}] were not stored: {source}")]
    BatchCommit {
        sources: String,
        first_row: u64,
        last_row: u64,
        #[source]
        source: StoreError,
    },
}

impl LoadError {
    /// Pipeline stage that failed
    pub fn stage(&self) -> LoadStage {
        match self {
            LoadError::Config(_) => LoadStage::Configuration,
            LoadError::Dictionary(_) => LoadStage::DictionaryParse,
            LoadError::Schema(_) => LoadStage::TableCreation,
            LoadError::StoreInit(_) => LoadStage::StoreInit,
            LoadError::StoreClose(_) => LoadStage::StoreClose,
            LoadError::NoSources { .. } | LoadError::SourceScan { .. } => {
                LoadStage::SourceResolution
            }
            LoadError::FileOpen { .. } => LoadStage::FileOpen,
            LoadError::FileRead { .. } => LoadStage::FileRead,
            LoadError::BatchCommit { .. } => LoadStage::BatchCommit,
        }
    }

    /// Taxonomy bucket of the failure
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoadError::Config(_) | LoadError::NoSources { .. } => ErrorCategory::Configuration,
            LoadError::Dictionary(e) if e.is_io() => ErrorCategory::Io,
            LoadError::Dictionary(_) => ErrorCategory::Configuration,
            LoadError::Schema(_) => ErrorCategory::Schema,
            LoadError::StoreInit(_)
            | LoadError::StoreClose(_)
            | LoadError::SourceScan { .. }
            | LoadError::FileOpen { .. }
            | LoadError::FileRead { .. } => ErrorCategory::Io,
            LoadError::BatchCommit { .. } => ErrorCategory::BatchCommit,
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Config(_) => "SEER_LOAD_CONFIG_INVALID",
            LoadError::Dictionary(e) => e.code(),
            LoadError::Schema(e) => e.code(),
            LoadError::StoreInit(e) | LoadError::StoreClose(e) => e.code(),
            LoadError::NoSources { .. } => "SEER_LOAD_NO_SOURCES",
            LoadError::SourceScan { .. } => "SEER_LOAD_SOURCE_SCAN_FAILED",
            LoadError::FileOpen { .. } => "SEER_LOAD_FILE_OPEN_FAILED",
            LoadError::FileRead { .. } => "SEER_LOAD_FILE_READ_FAILED",
            LoadError::BatchCommit { .. } => "SEER_LOAD_BATCH_COMMIT_FAILED",
        }
    }

    /// Whether the failure is confined to one source file
    pub fn is_file_error(&self) -> bool {
        matches!(self, LoadError::FileOpen { .. } | LoadError::FileRead { .. })
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        LoadError::Config(msg.into())
    }
}
