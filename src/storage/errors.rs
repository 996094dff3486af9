//! Store gateway errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store gateway errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Existing store file could not be removed for a reset load
    #[error("failed to remove store file {path}: {source}")]
    ResetFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Store file does not exist and creation was not requested
    #[error("store file not found: {0}")]
    NotFound(PathBuf),

    /// Connection could not be opened
    #[error("failed to open store {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// A pragma could not be applied on open
    #[error("failed to set pragma {name}: {source}")]
    Pragma {
        name: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A single statement failed
    #[error("statement failed: {source} [{statement}]")]
    Execute {
        statement: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A row of a multi-row insert failed; the batch was rolled back
    #[error("batch insert failed at row {index} of {size}: {source}")]
    Batch {
        index: usize,
        size: usize,
        #[source]
        source: rusqlite::Error,
    },

    /// Transaction could not be committed
    #[error("commit failed: {0}")]
    Commit(#[source] rusqlite::Error),

    /// Read query failed
    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// Connection could not be closed cleanly
    #[error("failed to close store: {0}")]
    Close(#[source] rusqlite::Error),

    /// Gateway used after close
    #[error("store connection is closed")]
    Closed,
}

impl StoreError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::ResetFailed { .. } => "SEER_STORE_RESET_FAILED",
            StoreError::NotFound(_) => "SEER_STORE_NOT_FOUND",
            StoreError::Open { .. } => "SEER_STORE_OPEN_FAILED",
            StoreError::Pragma { .. } => "SEER_STORE_PRAGMA_FAILED",
            StoreError::Execute { .. } => "SEER_STORE_EXECUTE_FAILED",
            StoreError::Batch { .. } => "SEER_STORE_BATCH_FAILED",
            StoreError::Commit(_) => "SEER_STORE_COMMIT_FAILED",
            StoreError::Query(_) => "SEER_STORE_QUERY_FAILED",
            StoreError::Close(_) => "SEER_STORE_CLOSE_FAILED",
            StoreError::Closed => "SEER_STORE_CLOSED",
        }
    }

    /// Whether the failure came from the filesystem rather than SQLite
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::ResetFailed { .. } | StoreError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_failed_is_io() {
        let err = StoreError::ResetFailed {
            path: PathBuf::from("/tmp/seer.db"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
        };
        assert!(err.is_io());
        assert_eq!(err.code(), "SEER_STORE_RESET_FAILED");
        assert!(err.to_string().contains("seer.db"));
    }

    #[test]
    fn test_closed_is_not_io() {
        assert!(!StoreError::Closed.is_io());
    }
}
