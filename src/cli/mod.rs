//! CLI module for seerload
//!
//! Provides command-line interface for:
//! - load: Run a load session and print its report
//! - dictionary: Parse a data dictionary and print its fields
//! - sample: Read a sample of rows from a loaded table

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, LoadArgs, SampleArgs};
pub use commands::{
    dictionary_listing, load, resolve_config, run, run_command, sample, DictionaryListing,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_response, write_to};
