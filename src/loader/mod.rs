//! Load subsystem
//!
//! Turns fixed-width registry files into rows of one store table.
//!
//! # Flow
//!
//! `LoadConfig` → `LoadSession::prepare` (validate, parse dictionary, build
//! schema) → `run` (store init, table creation, source resolution, batched
//! loading) → `LoadReport`.
//!
//! # Invariants
//!
//! - Every decoded row is committed exactly once, including the trailing
//!   partial batch
//! - A batch is applied entirely or not at all
//! - Files load in sorted order, lines in file order
//! - Every row carries the provenance of the file it came from

mod batch;
mod config;
mod decoder;
mod errors;
mod pipeline;
mod report;
mod session;
mod sources;

pub use batch::Batch;
pub use config::{FileErrorPolicy, LoadConfig, DEFAULT_BATCH_SIZE};
pub use decoder::{strip_line_terminator, RecordDecoder, Row};
pub use errors::{ErrorCategory, LoadError, LoadResult, LoadStage};
pub use pipeline::{run, BatchLoader, TEST_MODE_ROW_CAP};
pub use report::{FileReport, LoadReport, SkippedFile};
pub use session::LoadSession;
pub use sources::{resolve_sources, source_name};
