//! seerload - data-dictionary-driven loader for fixed-width cancer registry files
//!
//! Parses a SAS-style data dictionary into a column layout, slices every line
//! of the registry's fixed-width files against it and stores the rows in a
//! single-file SQLite table, committed in batches.

pub mod cli;
pub mod dictionary;
pub mod loader;
pub mod observability;
pub mod sample;
pub mod schema;
pub mod storage;
