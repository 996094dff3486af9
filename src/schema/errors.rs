//! Schema error types
//!
//! Error codes:
//! - SEER_SCHEMA_INVALID_IDENTIFIER
//! - SEER_SCHEMA_RESERVED_IDENTIFIER
//! - SEER_SCHEMA_DUPLICATE_COLUMN
//! - SEER_SCHEMA_INVALID_FIELD
//! - SEER_SCHEMA_EMPTY
//! - SEER_SCHEMA_TABLE_EXISTS
//! - SEER_SCHEMA_STORE_FAILED
//!
//! All schema errors are fatal for a load session: they are raised before any
//! data row is decoded.

use thiserror::Error;

use crate::storage::StoreError;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Failures while validating a column layout or creating its table.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Name does not match the identifier allow-list
    #[error("invalid identifier '{name}': {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    /// Name is reserved (provenance column or SQL keyword)
    #[error("identifier '{0}' is reserved")]
    ReservedIdentifier(String),

    /// Two fields share a column name
    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    /// Field width or position cannot describe a slice of a line
    #[error("invalid field '{name}': {reason}")]
    InvalidField { name: String, reason: &'static str },

    /// A schema must carry at least one field
    #[error("schema has no fields")]
    Empty,

    /// Table already present and no reset was requested
    #[error("table '{0}' already exists")]
    TableExists(String),

    /// Store refused the data-definition statement
    #[error("failed to create table '{table}': {source}")]
    Store {
        table: String,
        #[source]
        source: StoreError,
    },
}

impl SchemaError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::InvalidIdentifier { .. } => "SEER_SCHEMA_INVALID_IDENTIFIER",
            SchemaError::ReservedIdentifier(_) => "SEER_SCHEMA_RESERVED_IDENTIFIER",
            SchemaError::DuplicateColumn(_) => "SEER_SCHEMA_DUPLICATE_COLUMN",
            SchemaError::InvalidField { .. } => "SEER_SCHEMA_INVALID_FIELD",
            SchemaError::Empty => "SEER_SCHEMA_EMPTY",
            SchemaError::TableExists(_) => "SEER_SCHEMA_TABLE_EXISTS",
            SchemaError::Store { .. } => "SEER_SCHEMA_STORE_FAILED",
        }
    }
}
