//! CLI command implementations
//!
//! Each command resolves its options, installs logging, does its work and
//! writes a single JSON response on stdout.

use std::path::Path;

use serde::Serialize;

use crate::dictionary::DictionaryParser;
use crate::loader::{self, LoadConfig, LoadSession};
use crate::observability::{init_logging, LogFormat};
use crate::sample::{ExclusionRule, SampleQuery};
use crate::schema::{FieldDescriptor, Schema};
use crate::storage::StoreGateway;

use super::args::{Command, LoadArgs, SampleArgs};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Load(args) => load(args),
        Command::Dictionary { path, dictionary } => describe_dictionary(&path, dictionary),
        Command::Sample(args) => sample(args),
    }
}

/// Builds the load configuration: config file first, then flags.
///
/// Validation happens when the session is prepared.
pub fn resolve_config(args: LoadArgs) -> CliResult<LoadConfig> {
    let mut config = match (&args.config, &args.path) {
        (Some(file), _) => LoadConfig::load(file)?,
        (None, Some(path)) => LoadConfig::new(path.clone()),
        (None, None) => {
            return Err(CliError::config_error(
                "either --config or --path is required",
            ))
        }
    };

    if let Some(path) = args.path {
        config.path = path;
    }
    if let Some(dictionary) = args.dictionary {
        config.dictionary = dictionary;
    }
    if let Some(data) = args.data {
        config.data = data;
    }
    if let Some(table) = args.table {
        config.table = table;
    }
    if let Some(db_name) = args.db_name {
        config.db_name = db_name;
    }
    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if args.no_reload {
        config.reload = false;
    }
    if args.test_mode {
        config.test_mode = true;
    }
    if args.quiet {
        config.verbose = false;
    }
    if let Some(policy) = args.on_file_error {
        config.on_file_error = policy;
    }
    if let Some(format) = args.log_format {
        config.log_format = format;
    }

    Ok(config)
}

/// Run a load session and print its report
pub fn load(args: LoadArgs) -> CliResult<()> {
    let config = resolve_config(args)?;
    init_logging(config.verbose, config.log_format);

    let session = LoadSession::prepare(config)?;
    let report = loader::run(&session)?;

    write_response(&report)
}

/// Field listing of a dictionary
#[derive(Debug, Serialize)]
pub struct DictionaryListing {
    pub dictionary: String,
    pub record_width: usize,
    pub fields: Vec<FieldDescriptor>,
}

/// Parse a dictionary without touching any store
pub fn dictionary_listing(path: &str, dictionary: Option<String>) -> CliResult<DictionaryListing> {
    let mut config = LoadConfig::new(path);
    if let Some(dictionary) = dictionary {
        config.dictionary = dictionary;
    }
    let dictionary_path = config.dictionary_path();

    let fields = DictionaryParser::new().parse_file(&dictionary_path)?;
    let schema = Schema::new(fields)?;

    Ok(DictionaryListing {
        dictionary: dictionary_path.display().to_string(),
        record_width: schema.record_width(),
        fields: schema.fields().to_vec(),
    })
}

fn describe_dictionary(path: &str, dictionary: Option<String>) -> CliResult<()> {
    init_logging(false, LogFormat::Text);
    let listing = dictionary_listing(path, dictionary)?;
    write_response(&listing)
}

/// Run a sample query against an existing store
pub fn sample(args: SampleArgs) -> CliResult<()> {
    init_logging(false, LogFormat::Text);

    if args.db_name.contains(['/', '\\']) {
        return Err(CliError::config_error(format!(
            "db_name must be a plain file name, got '{}'",
            args.db_name
        )));
    }
    let store = Path::new(&args.path).join(&args.db_name);
    let gateway = StoreGateway::open_existing(&store)?;

    let mut query = SampleQuery::new(args.table)
        .with_columns(args.columns)
        .with_limit(args.limit)
        .randomized(args.random);
    if args.clean {
        query = query.excluding(ExclusionRule::registry_defaults());
    }

    let output = query.execute(&gateway)?;
    gateway.close()?;

    write_response(&output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FileErrorPolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_path_or_config_required() {
        let err = resolve_config(LoadArgs::default()).unwrap_err();
        assert_eq!(err.code_str(), "SEER_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("seerload.json");
        fs::write(
            &file,
            r#"{"path":"/data/seer","batch_size":1000,"test_mode":false,"on_file_error":"abort"}"#,
        )
        .unwrap();

        let config = resolve_config(LoadArgs {
            config: Some(file),
            batch_size: Some(250),
            test_mode: true,
            quiet: true,
            on_file_error: Some(FileErrorPolicy::Skip),
            ..LoadArgs::default()
        })
        .unwrap();

        assert_eq!(config.path, "/data/seer");
        assert_eq!(config.batch_size, 250);
        assert!(config.test_mode);
        assert!(!config.verbose);
        assert!(config.reload);
        assert_eq!(config.on_file_error, FileErrorPolicy::Skip);
    }

    #[test]
    fn test_invalid_config_file_is_config_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("seerload.json");
        fs::write(&file, "{not json").unwrap();

        let err = resolve_config(LoadArgs {
            config: Some(file),
            ..LoadArgs::default()
        })
        .unwrap_err();
        assert_eq!(err.code_str(), "SEER_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_dictionary_listing() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("read.sas"),
            "  @ 1 AGE_DX $char3. /* age */\n  @ 4 YEAR $char4. /* year */\n",
        )
        .unwrap();

        let listing =
            dictionary_listing(&tmp.path().to_string_lossy(), Some("read.sas".into())).unwrap();
        assert_eq!(listing.record_width, 7);
        assert_eq!(listing.fields.len(), 2);
        assert_eq!(listing.fields[1].name, "YEAR");
        assert_eq!(listing.fields[1].offset, 3);
    }

    #[test]
    fn test_sample_without_store() {
        let tmp = TempDir::new().unwrap();
        let err = sample(SampleArgs {
            path: tmp.path().to_string_lossy().into_owned(),
            db_name: "seer.db".into(),
            table: "seer".into(),
            columns: vec![],
            limit: 10,
            random: false,
            clean: false,
        })
        .unwrap_err();
        assert!(err.message().contains("SEER_STORE_NOT_FOUND"));
    }
}
