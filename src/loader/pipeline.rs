//! Batch loading pipeline
//!
//! Runs one load session end to end:
//!
//! 1. Initialize the store (reset removes the file first)
//! 2. Create the table, or reuse it on a non-reset load
//! 3. Resolve source files
//! 4. Stream every line of every file through the decoder into the batch,
//!    committing whenever the batch is full
//! 5. Flush the trailing partial batch and close the store
//!
//! Processing is strictly sequential: files in resolved order, lines in file
//! order, rows committed in accumulation order. The store connection and the
//! open source file are released on every exit path; a fatal error rolls
//! back the batch in flight and leaves earlier batches in place.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info, instrument};

use super::batch::Batch;
use super::config::FileErrorPolicy;
use super::decoder::RecordDecoder;
use super::errors::{LoadError, LoadResult};
use super::report::{throughput, FileReport, LoadReport, SkippedFile};
use super::session::LoadSession;
use super::sources::{resolve_sources, source_name};
use crate::observability::{log_event, Event, LoadMetrics, ObservationScope, Timer};
use crate::storage::StoreGateway;

/// Rows after which a test-mode load stops.
pub const TEST_MODE_ROW_CAP: u64 = 100;

/// Runs the session against its store and returns the load report.
#[instrument(name = "load", skip(session), fields(session_id = %session.id(), table = session.table()))]
pub fn run(session: &LoadSession) -> LoadResult<LoadReport> {
    let config = session.config();
    let store_path = config.store_path();
    let timer = Timer::new();

    let mut gateway = StoreGateway::initialize(&store_path, config.reload, &config.store)
        .map_err(|e| aborted(LoadError::StoreInit(e)))?;
    let opened = if config.reload {
        Event::StoreReset
    } else {
        Event::StoreOpened
    };
    log_event(opened, &[("path", &store_path.display().to_string())]);

    // On error the gateway is dropped here, rolling back the open batch.
    let report = load(session, &mut gateway, &timer).map_err(aborted)?;

    gateway
        .close()
        .map_err(|e| aborted(LoadError::StoreClose(e)))?;
    log_event(Event::StoreClosed, &[("path", &store_path.display().to_string())]);

    log_event(
        Event::LoadComplete,
        &[
            ("rows", &report.total_rows.to_string()),
            ("files", &report.files.len().to_string()),
            ("skipped", &report.skipped.len().to_string()),
            ("elapsed_secs", &format!("{:.3}", report.elapsed_secs)),
            ("rows_per_sec", &format!("{:.0}", report.rows_per_sec)),
        ],
    );
    Ok(report)
}

fn load(session: &LoadSession, gateway: &mut StoreGateway, timer: &Timer) -> LoadResult<LoadReport> {
    let config = session.config();
    let builder = session.schema_builder()?;

    let created = if config.reload {
        builder.create_table(gateway)?;
        true
    } else {
        builder.ensure_table(gateway)?
    };
    let event = if created {
        Event::TableCreated
    } else {
        Event::TableReused
    };
    log_event(
        event,
        &[
            ("table", session.table()),
            ("columns", &(session.schema().len() + 1).to_string()),
        ],
    );

    let sources = resolve_sources(config.base_dir(), &config.data)?;
    debug!(count = sources.len(), "sources resolved");

    let mut loader = BatchLoader::new(session, gateway);
    loader.load_all(&sources)?;
    Ok(loader.into_report(config.store_path(), timer.elapsed()))
}

/// Logs the abort with the failing stage and hands the error back.
fn aborted(err: LoadError) -> LoadError {
    log_event(
        Event::LoadAborted,
        &[
            ("stage", err.stage().as_str()),
            ("code", err.code()),
            ("error", &err.to_string()),
        ],
    );
    err
}

/// Whether the loader should go on with the next file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Continue,
    Stop,
}

/// Streams source files into the store, one batch at a time.
pub struct BatchLoader<'s, 'g> {
    session: &'s LoadSession,
    gateway: &'g mut StoreGateway,
    decoder: RecordDecoder<'s>,
    batch: Batch,
    metrics: LoadMetrics,
    /// Rows decoded so far in this load; also the ordinal of the last row
    total_rows: u64,
    /// Rows decoded from the file being read
    file_rows: u64,
    files: Vec<FileReport>,
    skipped: Vec<SkippedFile>,
    stopped_early: bool,
}

impl<'s, 'g> BatchLoader<'s, 'g> {
    pub fn new(session: &'s LoadSession, gateway: &'g mut StoreGateway) -> Self {
        Self {
            session,
            gateway,
            decoder: RecordDecoder::new(session.schema()),
            batch: Batch::with_capacity(session.config().batch_size),
            metrics: LoadMetrics::new(),
            total_rows: 0,
            file_rows: 0,
            files: Vec::new(),
            skipped: Vec::new(),
            stopped_early: false,
        }
    }

    /// Loads every source in order, then flushes the trailing batch.
    pub fn load_all(&mut self, sources: &[PathBuf]) -> LoadResult<()> {
        let policy = self.session.config().on_file_error;

        for path in sources {
            match self.load_file(path) {
                Ok(FileOutcome::Continue) => {}
                Ok(FileOutcome::Stop) => {
                    self.stopped_early = true;
                    break;
                }
                Err(e) if e.is_file_error() && policy == FileErrorPolicy::Skip => {
                    self.skip_file(path, &e);
                }
                Err(e) => return Err(e),
            }
        }

        self.flush()
    }

    fn skip_file(&mut self, path: &Path, err: &LoadError) {
        log_event(
            Event::FileSkipped,
            &[
                ("path", &path.display().to_string()),
                ("rows_read", &self.file_rows.to_string()),
                ("error", &err.to_string()),
            ],
        );
        self.metrics.increment_files_skipped();
        self.skipped.push(SkippedFile {
            path: path.display().to_string(),
            rows_read: self.file_rows,
            error: err.to_string(),
        });
    }

    fn load_file(&mut self, path: &Path) -> LoadResult<FileOutcome> {
        let source = source_name(path);
        let scope = ObservationScope::with_subject("FILE_LOAD", path.display().to_string());
        log_event(
            Event::FileStart,
            &[("path", &path.display().to_string()), ("source", &source)],
        );

        self.file_rows = 0;
        let result = self.read_file(path, &source);
        match &result {
            Ok(_) => scope.complete_with_rows(self.file_rows),
            Err(e) => scope.fail(&e.to_string()),
        }
        result
    }

    fn read_file(&mut self, path: &Path, source: &str) -> LoadResult<FileOutcome> {
        let file = File::open(path).map_err(|e| LoadError::FileOpen {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut reader = BufReader::new(file);
        let test_mode = self.session.config().test_mode;

        let mut line = Vec::new();
        let mut line_number = 0u64;
        let mut short_lines = 0u64;
        loop {
            line.clear();
            let read = reader
                .read_until(b'\n', &mut line)
                .map_err(|e| LoadError::FileRead {
                    path: path.to_path_buf(),
                    line: line_number + 1,
                    source: e,
                })?;
            if read == 0 {
                break;
            }
            line_number += 1;

            if self.decoder.is_short(&line) {
                short_lines += 1;
                self.metrics.increment_short_lines();
            }
            let row = self.decoder.decode(source, &line);
            self.metrics.increment_rows_decoded();
            self.total_rows += 1;
            self.file_rows += 1;
            self.batch.push(row, self.total_rows);

            if self.batch.is_full() {
                self.flush()?;
            }

            if test_mode && self.total_rows >= TEST_MODE_ROW_CAP {
                self.flush()?;
                log_event(
                    Event::TestModeCapReached,
                    &[
                        ("cap", &TEST_MODE_ROW_CAP.to_string()),
                        ("path", &path.display().to_string()),
                        ("line", &line_number.to_string()),
                    ],
                );
                self.finish_file(path, source, short_lines);
                return Ok(FileOutcome::Stop);
            }
        }

        self.finish_file(path, source, short_lines);
        Ok(FileOutcome::Continue)
    }

    fn finish_file(&mut self, path: &Path, source: &str, short_lines: u64) {
        log_event(
            Event::FileComplete,
            &[
                ("path", &path.display().to_string()),
                ("rows", &self.file_rows.to_string()),
                ("short_lines", &short_lines.to_string()),
            ],
        );
        self.metrics.increment_files_loaded();
        self.files.push(FileReport {
            path: path.display().to_string(),
            source: source.to_string(),
            rows: self.file_rows,
            short_lines,
        });
    }

    /// Commits the accumulated rows as one transaction and clears the batch.
    ///
    /// Does nothing when the batch is empty, so the end-of-processing flush
    /// never commits a batch twice.
    fn flush(&mut self) -> LoadResult<()> {
        let Some((first_row, last_row)) = self.batch.span() else {
            return Ok(());
        };

        let committed = self
            .gateway
            .execute_batch(self.session.insert_sql(), self.batch.rows())
            .and_then(|staged| {
                self.gateway.commit()?;
                Ok(staged)
            });

        let staged = match committed {
            Ok(staged) => staged as u64,
            Err(source) => {
                let sources = self.batch.sources().join(",");
                log_event(
                    Event::BatchFailed,
                    &[
                        ("first_row", &first_row.to_string()),
                        ("last_row", &last_row.to_string()),
                        ("sources", &sources),
                        ("error", &source.to_string()),
                    ],
                );
                return Err(LoadError::BatchCommit {
                    sources,
                    first_row,
                    last_row,
                    source,
                });
            }
        };

        self.metrics.record_batch(staged);
        if self.session.config().verbose {
            info!(
                event = Event::BatchCommitted.as_str(),
                rows = staged,
                total = self.metrics.rows_committed(),
                last_row,
                "batch committed"
            );
        } else {
            debug!(
                event = Event::BatchCommitted.as_str(),
                rows = staged,
                total = self.metrics.rows_committed(),
                last_row,
                "batch committed"
            );
        }

        self.batch.clear();
        Ok(())
    }

    /// Consumes the loader into the report of everything it read.
    pub fn into_report(self, store: PathBuf, elapsed: Duration) -> LoadReport {
        let metrics = self.metrics.snapshot();
        LoadReport {
            session_id: self.session.id(),
            table: self.session.table().to_string(),
            store: store.display().to_string(),
            started_at: self.session.started_at(),
            files: self.files,
            skipped: self.skipped,
            total_rows: self.total_rows,
            rows_committed: metrics.rows_committed,
            batches: metrics.batches_committed,
            short_lines: metrics.short_lines,
            elapsed_secs: elapsed.as_secs_f64(),
            rows_per_sec: throughput(self.total_rows, elapsed),
            stopped_early: self.stopped_early,
        }
    }
}
