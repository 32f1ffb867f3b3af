//! SQLite backend

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, OpenFlags, TransactionBehavior};

use super::connection::{Connection, ConnectionProvider, DbError, DbResult, Execution, Row, Value};
use super::schema::Dialect;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::Owned(rusqlite::types::Value::Null),
            Value::Int(v) => ToSqlOutput::from(*v),
            Value::Float(v) => ToSqlOutput::from(*v),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Bytes(b) => ToSqlOutput::from(b.as_slice()),
            Value::Timestamp(ts) => ToSqlOutput::from(ts.format(TIMESTAMP_FORMAT).to_string()),
        })
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(v) => Value::Int(v),
            ValueRef::Real(v) => Value::Float(v),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Bytes(b.to_vec()),
        }
    }
}

/// Opens a new SQLite connection to a database file on every call
#[derive(Debug, Clone)]
pub struct SqliteConnectionProvider {
    path: PathBuf,
    create: bool,
}

impl SqliteConnectionProvider {
    /// Provider for an existing database file. A missing file is a connection error.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create: false,
        }
    }

    /// Provider that creates the database file on first open
    pub fn create_if_missing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            create: true,
        }
    }

    fn open_flags(&self) -> OpenFlags {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.create {
            flags | OpenFlags::SQLITE_OPEN_CREATE
        } else {
            flags
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionProvider for SqliteConnectionProvider {
    type Conn = SqliteConnection;

    fn get_connection(&self) -> DbResult<SqliteConnection> {
        tracing::debug!("Opening SQLite connection at {:?}", self.path);

        let conn = rusqlite::Connection::open_with_flags(&self.path, self.open_flags())
            .map_err(DbError::connection)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(DbError::connection)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(DbError::connection)?;

        Ok(SqliteConnection { conn })
    }

    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }
}

#[derive(Debug)]
pub struct SqliteConnection {
    conn: rusqlite::Connection,
}

impl Connection for SqliteConnection {
    fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        tracing::debug!("sqlite query: {}", sql.trim());

        let mut stmt = self.conn.prepare(sql).map_err(DbError::query)?;
        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt
            .query(params_from_iter(params.iter()))
            .map_err(DbError::query)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(DbError::query)? {
            let values = (0..columns.len())
                .map(|idx| row.get_ref(idx).map(Value::from))
                .collect::<Result<Vec<_>, _>>()
                .map_err(DbError::query)?;
            result.push(Row::new(Arc::clone(&columns), values));
        }

        Ok(result)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<Execution> {
        tracing::debug!("sqlite execute: {}", sql.trim());

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::query)?;
        let rowid_before = tx.last_insert_rowid();
        let affected = tx
            .execute(sql, params_from_iter(params.iter()))
            .map_err(DbError::query)?;
        let rowid_after = tx.last_insert_rowid();
        tx.commit().map_err(DbError::query)?;

        Ok(Execution {
            affected_rows: affected as u64,
            last_insert_id: (rowid_after != rowid_before).then_some(rowid_after),
        })
    }

    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.conn.execute_batch(sql).map_err(DbError::query)
    }
}
