//! Connection options applied when a store is opened

use serde::{Deserialize, Serialize};

/// SQLite rollback journal mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JournalMode {
    #[default]
    Delete,
    Truncate,
    Persist,
    Memory,
    Wal,
    Off,
}

impl JournalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Truncate => "TRUNCATE",
            JournalMode::Persist => "PERSIST",
            JournalMode::Memory => "MEMORY",
            JournalMode::Wal => "WAL",
            JournalMode::Off => "OFF",
        }
    }
}

/// SQLite fsync policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynchronousMode {
    Off,
    Normal,
    #[default]
    Full,
    Extra,
}

impl SynchronousMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynchronousMode::Off => "OFF",
            SynchronousMode::Normal => "NORMAL",
            SynchronousMode::Full => "FULL",
            SynchronousMode::Extra => "EXTRA",
        }
    }
}

/// Options for opening a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreOptions {
    #[serde(default)]
    pub journal_mode: JournalMode,
    #[serde(default)]
    pub synchronous: SynchronousMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sqlite() {
        let options = StoreOptions::default();
        assert_eq!(options.journal_mode.as_str(), "DELETE");
        assert_eq!(options.synchronous.as_str(), "FULL");
    }

    #[test]
    fn test_deserialize_lowercase() {
        let options: StoreOptions =
            serde_json::from_str(r#"{"journal_mode":"wal","synchronous":"normal"}"#).unwrap();
        assert_eq!(options.journal_mode, JournalMode::Wal);
        assert_eq!(options.synchronous, SynchronousMode::Normal);
    }
}
