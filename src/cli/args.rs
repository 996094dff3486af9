//! CLI argument definitions using clap
//!
//! Commands:
//! - seerload load [--config <file>] [--path <dir>] ...
//! - seerload dictionary --path <dir> [--dictionary <file>]
//! - seerload sample --path <dir> [--table <name>] [--columns A,B] ...

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::loader::FileErrorPolicy;
use crate::observability::LogFormat;

/// seerload - load fixed-width cancer registry files into SQLite
#[derive(Parser, Debug)]
#[command(name = "seerload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load data files into the store using a data dictionary
    Load(LoadArgs),

    /// Parse a data dictionary and print its fields
    Dictionary {
        /// Base directory
        #[arg(long)]
        path: String,

        /// Dictionary document, relative to the base directory
        #[arg(long)]
        dictionary: Option<String>,
    },

    /// Read a sample of rows from a loaded table
    Sample(SampleArgs),
}

/// Options of the load command. Flags override the config file.
#[derive(Args, Debug, Default)]
pub struct LoadArgs {
    /// JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base directory (required without --config)
    #[arg(long)]
    pub path: Option<String>,

    /// Dictionary document, relative to the base directory
    #[arg(long)]
    pub dictionary: Option<String>,

    /// Data file or pattern (`*` and `?` in the file name)
    #[arg(long)]
    pub data: Option<String>,

    /// Target table
    #[arg(long)]
    pub table: Option<String>,

    /// Store file name inside the base directory
    #[arg(long)]
    pub db_name: Option<String>,

    /// Rows per committed batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Keep the existing store and append to it
    #[arg(long)]
    pub no_reload: bool,

    /// Stop after the first rows
    #[arg(long)]
    pub test_mode: bool,

    /// Batch progress at DEBUG instead of INFO
    #[arg(long)]
    pub quiet: bool,

    /// What to do when a data file cannot be read: abort or skip
    #[arg(long)]
    pub on_file_error: Option<FileErrorPolicy>,

    /// Log output: text or json
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

/// Options of the sample command
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Base directory holding the store
    #[arg(long)]
    pub path: String,

    /// Store file name inside the base directory
    #[arg(long, default_value = "seer.db")]
    pub db_name: String,

    #[arg(long, default_value = "seer")]
    pub table: String,

    /// Comma-separated columns; all columns when omitted
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    #[arg(long, default_value_t = crate::sample::DEFAULT_SAMPLE_LIMIT)]
    pub limit: usize,

    /// Random order instead of storage order
    #[arg(long)]
    pub random: bool,

    /// Apply the registry exclusion rules
    #[arg(long)]
    pub clean: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_flags() {
        let cli = Cli::try_parse_from([
            "seerload",
            "load",
            "--path",
            "./data",
            "--batch-size",
            "100",
            "--no-reload",
            "--on-file-error",
            "skip",
            "--log-format",
            "json",
        ])
        .unwrap();

        let Command::Load(args) = cli.command else {
            panic!("expected load command");
        };
        assert_eq!(args.path.as_deref(), Some("./data"));
        assert_eq!(args.batch_size, Some(100));
        assert!(args.no_reload);
        assert_eq!(args.on_file_error, Some(FileErrorPolicy::Skip));
        assert_eq!(args.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn test_sample_columns_split() {
        let cli = Cli::try_parse_from([
            "seerload", "sample", "--path", "./data", "--columns", "AGE_DX,YEAR", "--clean",
        ])
        .unwrap();

        let Command::Sample(args) = cli.command else {
            panic!("expected sample command");
        };
        assert_eq!(args.columns, vec!["AGE_DX", "YEAR"]);
        assert_eq!(args.limit, 10);
        assert!(args.clean);
    }

    #[test]
    fn test_bad_policy_rejected() {
        let result = Cli::try_parse_from([
            "seerload",
            "load",
            "--path",
            "./data",
            "--on-file-error",
            "retry",
        ]);
        assert!(result.is_err());
    }
}
