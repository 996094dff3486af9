//! Sample query errors
//!
//! Error codes:
//! - SEER_SAMPLE_UNKNOWN_TABLE
//! - SEER_SAMPLE_UNKNOWN_COLUMN
//! - SEER_SAMPLE_INVALID_LIMIT
//! - plus the codes of wrapped schema and store errors

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StoreError;

/// Result type for sample queries
pub type SampleResult<T> = Result<T, SampleError>;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("table '{0}' does not exist")]
    UnknownTable(String),

    /// Requested column is not part of the table
    #[error("column '{column}' does not exist in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("sample limit must be > 0")]
    InvalidLimit,

    #[error("{0}")]
    Schema(#[from] SchemaError),

    #[error("{0}")]
    Store(#[from] StoreError),
}

impl SampleError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SampleError::UnknownTable(_) => "SEER_SAMPLE_UNKNOWN_TABLE",
            SampleError::UnknownColumn { .. } => "SEER_SAMPLE_UNKNOWN_COLUMN",
            SampleError::InvalidLimit => "SEER_SAMPLE_INVALID_LIMIT",
            SampleError::Schema(e) => e.code(),
            SampleError::Store(e) => e.code(),
        }
    }
}
