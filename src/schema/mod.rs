//! Column layout and table creation
//!
//! A `Schema` is derived at runtime from a data dictionary and fixes both the
//! slicing order of a fixed-width record and the column order of its table.
//!
//! # Design Principles
//!
//! - Built once per load session, immutable afterwards
//! - Every column name passes the identifier allow-list before any SQL is
//!   rendered
//! - Columns are untyped text; no coercion at load time

mod builder;
mod errors;
mod types;
mod validator;

pub use builder::SchemaBuilder;
pub use errors::{SchemaError, SchemaResult};
pub use types::{FieldDescriptor, Schema};
pub use validator::{validate_column_name, validate_table_name, SOURCE_COLUMN};
