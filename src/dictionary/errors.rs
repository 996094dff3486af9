//! Dictionary parser errors
//!
//! Error codes:
//! - SEER_DICTIONARY_READ_FAILED (I/O)
//! - SEER_DICTIONARY_EMPTY (configuration)
//! - SEER_DICTIONARY_INVALID_OFFSET (configuration)
//! - SEER_DICTIONARY_INVALID_LENGTH (configuration)

use std::io;

use thiserror::Error;

/// Result type for dictionary operations
pub type DictionaryResult<T> = Result<T, DictionaryError>;

/// Dictionary parser errors
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// Document missing or unreadable
    #[error("failed to read dictionary {origin}: {source}")]
    Read {
        origin: String,
        #[source]
        source: io::Error,
    },

    /// No line of the document declared a field
    #[error("dictionary {0} declares no fields")]
    Empty(String),

    /// Declared offset cannot be converted to a 0-based position, or the
    /// field would end past the addressable range
    #[error("line {line}: invalid field offset '{value}'")]
    InvalidOffset { line: usize, value: String },

    /// Declared length is zero or out of range
    #[error("line {line}: invalid field length '{value}'")]
    InvalidLength { line: usize, value: String },
}

impl DictionaryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            DictionaryError::Read { .. } => "SEER_DICTIONARY_READ_FAILED",
            DictionaryError::Empty(_) => "SEER_DICTIONARY_EMPTY",
            DictionaryError::InvalidOffset { .. } => "SEER_DICTIONARY_INVALID_OFFSET",
            DictionaryError::InvalidLength { .. } => "SEER_DICTIONARY_INVALID_LENGTH",
        }
    }

    /// Whether this is an I/O failure rather than a bad document
    pub fn is_io(&self) -> bool {
        matches!(self, DictionaryError::Read { .. })
    }
}
