//! CLI-specific error types
//!
//! All CLI errors are fatal: the binary prints them to stderr and exits 1.

use std::fmt;
use std::io;

use crate::dictionary::DictionaryError;
use crate::loader::LoadError;
use crate::sample::SampleError;
use crate::schema::SchemaError;
use crate::storage::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or flag error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Load session aborted
    LoadFailed,
    /// Dictionary could not be parsed
    DictionaryFailed,
    /// Sample query failed
    SampleFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SEER_CLI_CONFIG_ERROR",
            Self::IoError => "SEER_CLI_IO_ERROR",
            Self::LoadFailed => "SEER_CLI_LOAD_FAILED",
            Self::DictionaryFailed => "SEER_CLI_DICTIONARY_FAILED",
            Self::SampleFailed => "SEER_CLI_SAMPLE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<LoadError> for CliError {
    fn from(e: LoadError) -> Self {
        let code = match &e {
            LoadError::Config(_) => CliErrorCode::ConfigError,
            _ => CliErrorCode::LoadFailed,
        };
        Self::new(
            code,
            format!("[{}] load failed during {}: {}", e.code(), e.stage(), e),
        )
    }
}

impl From<DictionaryError> for CliError {
    fn from(e: DictionaryError) -> Self {
        Self::new(CliErrorCode::DictionaryFailed, format!("[{}] {}", e.code(), e))
    }
}

impl From<SchemaError> for CliError {
    fn from(e: SchemaError) -> Self {
        Self::new(CliErrorCode::DictionaryFailed, format!("[{}] {}", e.code(), e))
    }
}

impl From<SampleError> for CliError {
    fn from(e: SampleError) -> Self {
        Self::new(CliErrorCode::SampleFailed, format!("[{}] {}", e.code(), e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        Self::new(CliErrorCode::SampleFailed, format!("[{}] {}", e.code(), e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
