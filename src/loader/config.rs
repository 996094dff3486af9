//! Load configuration
//!
//! Read from an optional JSON file; every field except `path` has a default.
//! Command-line flags are applied on top by the CLI before validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{LoadError, LoadResult};
use crate::observability::LogFormat;
use crate::schema::validate_table_name;
use crate::storage::StoreOptions;

/// What to do when a source file cannot be opened or read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileErrorPolicy {
    /// Abort the whole load (default)
    #[default]
    Abort,
    /// Log the file as skipped and continue with the next one
    Skip,
}

impl std::str::FromStr for FileErrorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "abort" => Ok(FileErrorPolicy::Abort),
            "skip" => Ok(FileErrorPolicy::Skip),
            other => Err(format!("unknown file error policy '{}', expected abort or skip", other)),
        }
    }
}

/// Options of one load session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Base directory; dictionary, data pattern and store file are relative to it
    pub path: String,

    /// Dictionary document
    #[serde(default = "default_dictionary")]
    pub dictionary: String,

    /// Data file name or pattern (`*` and `?` in the file name only)
    #[serde(default = "default_data")]
    pub data: String,

    /// Target table
    #[serde(default = "default_table")]
    pub table: String,

    /// Store file name inside `path`
    #[serde(default = "default_db_name")]
    pub db_name: String,

    /// Destroy and recreate the store before loading
    #[serde(default = "default_true")]
    pub reload: bool,

    /// Stop after the first rows to validate the pipeline quickly
    #[serde(default)]
    pub test_mode: bool,

    /// Progress output at INFO
    #[serde(default = "default_true")]
    pub verbose: bool,

    /// Rows per committed batch
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub on_file_error: FileErrorPolicy,

    /// Pragmas applied when the store is opened
    #[serde(flatten)]
    pub store: StoreOptions,

    #[serde(default)]
    pub log_format: LogFormat,
}

pub const DEFAULT_BATCH_SIZE: usize = 5000;

fn default_dictionary() -> String {
    "incidence/read.seer.research.nov14.sas".to_string()
}
fn default_data() -> String {
    "incidence/yr1973_2012.seer9/breast.txt".to_string()
}
fn default_table() -> String {
    "seer".to_string()
}
fn default_db_name() -> String {
    "seer.db".to_string()
}
fn default_true() -> bool {
    true
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

impl LoadConfig {
    /// Configuration with every default and the given base directory
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            dictionary: default_dictionary(),
            data: default_data(),
            table: default_table(),
            db_name: default_db_name(),
            reload: true,
            test_mode: false,
            verbose: true,
            batch_size: DEFAULT_BATCH_SIZE,
            on_file_error: FileErrorPolicy::default(),
            store: StoreOptions::default(),
            log_format: LogFormat::default(),
        }
    }

    /// Load configuration from a JSON file. Validation is left to the caller
    /// so flags can be applied first.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            LoadError::config(format!("failed to read config {}: {}", path.display(), e))
        })?;

        serde_json::from_str(&content)
            .map_err(|e| LoadError::config(format!("invalid config JSON: {}", e)))
    }

    /// Validate all options
    pub fn validate(&self) -> LoadResult<()> {
        if self.path.trim().is_empty() {
            return Err(LoadError::config("path must be a non-empty string"));
        }
        if self.dictionary.trim().is_empty() {
            return Err(LoadError::config("dictionary must be a non-empty string"));
        }
        if self.data.trim().is_empty() {
            return Err(LoadError::config("data must be a non-empty string"));
        }
        if self.batch_size == 0 {
            return Err(LoadError::config("batch_size must be > 0"));
        }
        if self.db_name.is_empty() || self.db_name.contains(['/', '\\']) {
            return Err(LoadError::config(format!(
                "db_name must be a plain file name, got '{}'",
                self.db_name
            )));
        }
        validate_table_name(&self.table)
            .map_err(|e| LoadError::config(format!("invalid table name: {}", e)))?;

        Ok(())
    }

    /// Base directory
    pub fn base_dir(&self) -> &Path {
        Path::new(&self.path)
    }

    /// Full path of the dictionary document
    pub fn dictionary_path(&self) -> PathBuf {
        self.base_dir().join(relative_path(&self.dictionary))
    }

    /// Full path of the store file
    pub fn store_path(&self) -> PathBuf {
        self.base_dir().join(&self.db_name)
    }
}

/// Turns a relative path written with `/` or `\` separators into a `PathBuf`.
pub(crate) fn relative_path(raw: &str) -> PathBuf {
    let mut path = if raw.starts_with('/') {
        PathBuf::from("/")
    } else {
        PathBuf::new()
    };
    path.extend(raw.split(['/', '\\']).filter(|c| !c.is_empty()));
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let config: LoadConfig = serde_json::from_str(r#"{"path":"./data"}"#).unwrap();
        assert!(config.reload);
        assert!(!config.test_mode);
        assert!(config.verbose);
        assert_eq!(config.batch_size, 5000);
        assert_eq!(config.table, "seer");
        assert_eq!(config.db_name, "seer.db");
        assert_eq!(config.on_file_error, FileErrorPolicy::Abort);
        assert_eq!(config, LoadConfig::new("./data"));
    }

    #[test]
    fn test_store_options_flattened() {
        let config: LoadConfig =
            serde_json::from_str(r#"{"path":"./data","journal_mode":"wal"}"#).unwrap();
        assert_eq!(config.store.journal_mode.as_str(), "WAL");
    }

    #[test]
    fn test_path_required() {
        assert!(serde_json::from_str::<LoadConfig>(r#"{"reload":false}"#).is_err());
        assert!(LoadConfig::new("  ").validate().is_err());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut config = LoadConfig::new("./data");
        config.batch_size = 0;
        assert!(matches!(config.validate(), Err(LoadError::Config(_))));
    }

    #[test]
    fn test_table_name_validated() {
        let mut config = LoadConfig::new("./data");
        config.table = "seer; DROP TABLE x".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_db_name_must_be_plain() {
        let mut config = LoadConfig::new("./data");
        config.db_name = "../elsewhere.db".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backslash_paths_normalized() {
        let mut config = LoadConfig::new("/data");
        config.dictionary = r"incidence\read.seer.research.nov14.sas".into();
        assert_eq!(
            config.dictionary_path(),
            Path::new("/data/incidence/read.seer.research.nov14.sas")
        );
        assert_eq!(config.store_path(), Path::new("/data/seer.db"));
    }
}
