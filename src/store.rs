//! The store module owns all access to the SQLite catalog: opening a scoped read-only connection,
//! guarding statements with a deadline, and decoding rows into engine types.
//!
//! The database is produced by an external loader and is never written to by the engine.

use std::time::{Duration, Instant};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{Connection, ErrorCode, OpenFlags, Params, Row};
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::error::{Result, SongbookError};

/// How many SQLite VM instructions run between deadline checks.
const PROGRESS_CHECK_OPS: i32 = 1_000;

/// An opaque primary key from the catalog. The loader may use integer or text keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl FromSql for RecordId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(RecordId::Int(i)),
            ValueRef::Text(t) => Ok(RecordId::Text(String::from_utf8_lossy(t).into_owned())),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// A single cell of a result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
    Null,
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            // Blobs are decoded like text.
            ValueRef::Text(t) | ValueRef::Blob(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Null => Ok(()),
        }
    }
}

/// Tabular query output. Column order is the projection order of the query.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl RowSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Each row as (column, value) pairs in column order.
    pub fn records(&self) -> impl Iterator<Item = Vec<(&str, &Value)>> + '_ {
        self.rows
            .iter()
            .map(|row| self.columns.iter().map(String::as_str).zip(row.iter()).collect())
    }
}

/// A read-only connection scoped to one request. Dropping it closes the connection.
pub struct Store {
    conn: Connection,
    query_timeout: Duration,
}

impl Store {
    pub fn open(c: &Config) -> Result<Self> {
        let path = &c.database_path;
        if !path.is_file() {
            return Err(SongbookError::StoreUnavailable {
                path: path.clone(),
                reason: "database file does not exist".to_string(),
            });
        }
        let unavailable = |e: rusqlite::Error| SongbookError::StoreUnavailable {
            path: path.clone(),
            reason: e.to_string(),
        };

        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX)
            .map_err(unavailable)?;
        conn.execute_batch(&format!(
            "
            PRAGMA query_only = ON;
            PRAGMA busy_timeout = {};
            ",
            c.busy_timeout.as_millis()
        ))
        .map_err(unavailable)?;
        // Opening is lazy in SQLite; touch the schema so a corrupt or non-database file is caught here.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |_| Ok(()))
            .map_err(unavailable)?;

        debug!("Opened read-only store at {}", path.display());
        Ok(Self {
            conn,
            query_timeout: c.query_timeout,
        })
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Run `f` with a deadline installed. Statements still running at the deadline are interrupted
    /// and fail with `ErrorCode::OperationInterrupted`.
    fn guarded<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> rusqlite::Result<T> {
        let deadline = Instant::now() + self.query_timeout;
        self.conn
            .progress_handler(PROGRESS_CHECK_OPS, Some(move || Instant::now() >= deadline));
        let result = f(&self.conn);
        self.conn.progress_handler(PROGRESS_CHECK_OPS, None::<fn() -> bool>);
        result
    }

    pub fn query_map<T, P, F>(&self, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        self.guarded(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let rows = stmt.query_map(params, f)?.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn count(&self, sql: &str) -> rusqlite::Result<i64> {
        self.guarded(|conn| conn.query_row(sql, [], |row| row.get(0)))
    }

    /// Run an arbitrary SELECT and keep every column, typed per cell.
    pub fn row_set(&self, sql: &str) -> rusqlite::Result<RowSet> {
        self.guarded(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let width = columns.len();

            let mut rows = Vec::new();
            let mut cursor = stmt.query([])?;
            while let Some(row) = cursor.next()? {
                let mut values = Vec::with_capacity(width);
                for i in 0..width {
                    values.push(Value::from(row.get_ref(i)?));
                }
                rows.push(values);
            }
            Ok(RowSet { columns, rows })
        })
    }
}

/// Render a statement failure for an error value, calling out deadline expiry explicitly.
pub fn describe_failure(err: &rusqlite::Error, timeout: Duration) -> String {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::OperationInterrupted => {
            format!("query timed out after {} ms", timeout.as_millis())
        }
        _ => err.to_string(),
    }
}

/// Normalize a user search term. Blank terms match nothing, so they yield `None`.
pub fn search_term(term: &str) -> Option<&str> {
    let term = term.trim();
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Build a `LIKE ... ESCAPE '\'` pattern that matches `term` as a literal substring.
pub fn like_pattern(term: &str) -> String {
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    format!("%{escaped}%")
}
