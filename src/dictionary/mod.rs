//! Data dictionary subsystem
//!
//! Reads the registry's SAS input script and turns each
//! `@ offset NAME format. /* description */` declaration into a
//! `FieldDescriptor`. Declaration offsets are 1-based in the document and
//! 0-based in the descriptors.

mod errors;
mod parser;

pub use errors::{DictionaryError, DictionaryResult};
pub use parser::DictionaryParser;
