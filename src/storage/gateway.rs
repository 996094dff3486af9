//! Store gateway over a single-file SQLite database
//!
//! The gateway owns the only connection of a load session. Writes go through
//! `execute_batch` + `commit`, which stage a whole batch inside one
//! transaction: either every row of the batch is applied or none is.
//!
//! An open transaction is rolled back on `close()` and on drop, so an early
//! exit never leaves part of a batch behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use tracing::{debug, instrument, warn};

use super::errors::{StoreError, StoreResult};
use super::options::StoreOptions;

/// Rows returned by a read query: column names plus text values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Owner of the store connection for one session.
pub struct StoreGateway {
    path: PathBuf,
    conn: Option<Connection>,
    in_transaction: bool,
}

impl StoreGateway {
    /// Opens the store at `path`, creating it if needed.
    ///
    /// With `reset`, any existing file is removed first. A missing file is
    /// fine; any other removal failure (locked, permission denied) is fatal.
    #[instrument(name = "store::initialize", level = "debug", skip(path, options), fields(path = %path.display()))]
    pub fn initialize(path: &Path, reset: bool, options: &StoreOptions) -> StoreResult<Self> {
        if reset {
            match fs::remove_file(path) {
                Ok(()) => debug!("removed existing store file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StoreError::ResetFailed {
                        path: path.to_path_buf(),
                        source: e,
                    })
                }
            }
        }

        let conn = Connection::open(path).map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        conn.pragma_update_and_check(None, "journal_mode", options.journal_mode.as_str(), |row| {
            row.get::<_, String>(0)
        })
        .map_err(|e| StoreError::Pragma {
            name: "journal_mode",
            source: e,
        })?;
        conn.pragma_update(None, "synchronous", options.synchronous.as_str())
            .map_err(|e| StoreError::Pragma {
                name: "synchronous",
                source: e,
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
            in_transaction: false,
        })
    }

    /// Opens an existing store without creating it.
    pub fn open_existing(path: &Path) -> StoreResult<Self> {
        if !path.is_file() {
            return Err(StoreError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Open {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(Self {
            path: path.to_path_buf(),
            conn: Some(conn),
            in_transaction: false,
        })
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a batch is staged but not yet committed.
    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn conn(&self) -> StoreResult<&Connection> {
        self.conn.as_ref().ok_or(StoreError::Closed)
    }

    /// Executes one or more DDL/DML statements outside of a batch.
    pub fn execute(&mut self, sql: &str) -> StoreResult<()> {
        self.conn()?
            .execute_batch(sql)
            .map_err(|e| StoreError::Execute {
                statement: sql.to_string(),
                source: e,
            })
    }

    /// Stages `statement` once per row inside the open transaction.
    ///
    /// Opens a transaction when none is open. On the first failing row the
    /// whole transaction is rolled back, so nothing of the batch survives.
    /// Returns the number of rows staged.
    pub fn execute_batch<R: AsRef<[String]>>(
        &mut self,
        statement: &str,
        rows: &[R],
    ) -> StoreResult<usize> {
        let conn = self.conn.as_ref().ok_or(StoreError::Closed)?;

        if !self.in_transaction {
            conn.execute_batch("BEGIN").map_err(|e| StoreError::Execute {
                statement: "BEGIN".to_string(),
                source: e,
            })?;
            self.in_transaction = true;
        }

        let staged = Self::stage_rows(conn, statement, rows);
        if staged.is_err() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                warn!(error = %e, "rollback after failed batch did not complete");
            }
            self.in_transaction = false;
        }

        staged
    }

    fn stage_rows<R: AsRef<[String]>>(
        conn: &Connection,
        statement: &str,
        rows: &[R],
    ) -> StoreResult<usize> {
        let mut stmt = conn
            .prepare_cached(statement)
            .map_err(|e| StoreError::Execute {
                statement: statement.to_string(),
                source: e,
            })?;

        for (index, row) in rows.iter().enumerate() {
            stmt.execute(params_from_iter(row.as_ref().iter()))
                .map_err(|e| StoreError::Batch {
                    index,
                    size: rows.len(),
                    source: e,
                })?;
        }

        Ok(rows.len())
    }

    /// Commits the open transaction. No-op when nothing is staged.
    pub fn commit(&mut self) -> StoreResult<()> {
        if !self.in_transaction {
            return Ok(());
        }

        let conn = self.conn.as_ref().ok_or(StoreError::Closed)?;
        match conn.execute_batch("COMMIT") {
            Ok(()) => {
                self.in_transaction = false;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = conn.execute_batch("ROLLBACK") {
                    warn!(error = %rollback, "rollback after failed commit did not complete");
                }
                self.in_transaction = false;
                Err(StoreError::Commit(e))
            }
        }
    }

    /// Whether a table with this name exists.
    pub fn table_exists(&self, table: &str) -> StoreResult<bool> {
        let count: i64 = self
            .conn()?
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .map_err(StoreError::Query)?;
        Ok(count > 0)
    }

    /// Column names of a table, in table order. Empty if the table is absent.
    pub fn table_columns(&self, table: &str) -> StoreResult<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .map_err(StoreError::Query)?;
        let names = stmt
            .query_map([table], |row| row.get::<_, String>(0))
            .map_err(StoreError::Query)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Query)?;
        Ok(names)
    }

    /// Number of rows in a table.
    pub fn row_count(&self, table: &str) -> StoreResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self
            .conn()?
            .query_row(&sql, [], |row| row.get(0))
            .map_err(StoreError::Query)?;
        Ok(count.max(0) as u64)
    }

    /// Runs a read query and returns every value rendered as text.
    pub fn query(&self, sql: &str, params: &[&dyn ToSql]) -> StoreResult<QueryRows> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql).map_err(StoreError::Query)?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        let mut cursor = stmt.query(params).map_err(StoreError::Query)?;
        while let Some(row) = cursor.next().map_err(StoreError::Query)? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                let value = row.get_ref(i).map_err(StoreError::Query)?;
                values.push(value_to_text(value));
            }
            rows.push(values);
        }

        Ok(QueryRows { columns, rows })
    }

    /// Rolls back anything uncommitted and closes the connection.
    pub fn close(mut self) -> StoreResult<()> {
        self.rollback_open_transaction();
        match self.conn.take() {
            Some(conn) => conn.close().map_err(|(_, e)| StoreError::Close(e)),
            None => Ok(()),
        }
    }

    fn rollback_open_transaction(&mut self) {
        if !self.in_transaction {
            return;
        }
        if let Some(conn) = self.conn.as_ref() {
            if let Err(e) = conn.execute_batch("ROLLBACK") {
                warn!(error = %e, "rollback of uncommitted batch failed");
            } else {
                debug!("rolled back uncommitted batch");
            }
        }
        self.in_transaction = false;
    }
}

impl Drop for StoreGateway {
    fn drop(&mut self) {
        self.rollback_open_transaction();
    }
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    }
}
