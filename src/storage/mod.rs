//! Store gateway subsystem
//!
//! The persistent store is a single SQLite file holding one table per
//! dataset. This module owns the connection lifecycle: reset/open, plain
//! statements, batched inserts, commit and close.
//!
//! # Guarantees
//!
//! - One connection per session, exclusively owned
//! - Atomicity boundary is one batch: a staged batch is committed whole or
//!   rolled back whole
//! - Uncommitted work is rolled back on close and on drop
//! - Committed data is visible to read queries immediately

mod errors;
mod gateway;
mod options;

pub use errors::{StoreError, StoreResult};
pub use gateway::{QueryRows, StoreGateway};
pub use options::{JournalMode, StoreOptions, SynchronousMode};
