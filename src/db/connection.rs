//! Connection abstraction shared by every storage backend
//!
//! A [`ConnectionProvider`] opens a brand-new [`Connection`] on each call.
//! The connection is owned by the operation that asked for it and is closed
//! when it goes out of scope, on success and error paths alike.

use std::sync::Arc;

use chrono::NaiveDateTime;
use thiserror::Error;

use super::schema::Dialect;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection error: {0}")]
    Connection(#[source] BoxError),
    #[error("Query error: {0}")]
    Query(#[source] BoxError),
    #[error("Cannot map column '{column}': {reason}")]
    Mapping { column: String, reason: String },
}

impl DbError {
    pub fn connection<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        DbError::Connection(err.into())
    }

    pub fn query<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        DbError::Query(err.into())
    }

    fn mapping(column: &str, reason: impl Into<String>) -> Self {
        DbError::Mapping {
            column: column.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::Connection(_))
    }

    /// Row mapping failures count as query failures.
    pub fn is_query_error(&self) -> bool {
        matches!(self, DbError::Query(_) | DbError::Mapping { .. })
    }
}

pub type DbResult<T> = Result<T, DbError>;

/// A single SQL value, either bound as a parameter or read back from a row
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Timestamp(NaiveDateTime),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Timestamp(v)
    }
}

const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Parse the textual timestamp forms storage engines hand back
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
}

/// One result row with its column names
#[derive(Debug, Clone)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn value(&self, column: &str) -> DbResult<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|idx| self.values.get(idx))
            .ok_or_else(|| DbError::mapping(column, "column not present in result set"))
    }

    pub fn get_i64(&self, column: &str) -> DbResult<i64> {
        match self.value(column)? {
            Value::Int(v) => Ok(*v),
            Value::Text(s) => s
                .parse()
                .map_err(|_| DbError::mapping(column, format!("'{}' is not an integer", s))),
            other => Err(DbError::mapping(
                column,
                format!("expected integer, found {:?}", other),
            )),
        }
    }

    pub fn get_string(&self, column: &str) -> DbResult<String> {
        match self.value(column)? {
            Value::Text(s) => Ok(s.clone()),
            Value::Bytes(b) => String::from_utf8(b.clone())
                .map_err(|e| DbError::mapping(column, e.to_string())),
            other => Err(DbError::mapping(
                column,
                format!("expected text, found {:?}", other),
            )),
        }
    }

    pub fn get_timestamp(&self, column: &str) -> DbResult<NaiveDateTime> {
        match self.value(column)? {
            Value::Timestamp(ts) => Ok(*ts),
            Value::Text(s) => parse_timestamp(s)
                .ok_or_else(|| DbError::mapping(column, format!("'{}' is not a timestamp", s))),
            other => Err(DbError::mapping(
                column,
                format!("expected timestamp, found {:?}", other),
            )),
        }
    }
}

/// Outcome of a mutating statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    pub affected_rows: u64,
    /// Storage-assigned key of the inserted row, if the statement inserted one
    pub last_insert_id: Option<i64>,
}

/// A live, exclusively owned connection. Dropping it closes it.
///
/// SQL uses positional `?` placeholders on every backend.
pub trait Connection {
    fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>>;

    /// Run one statement in its own transaction and commit it.
    fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<Execution>;

    /// Run parameterless SQL such as DDL.
    fn execute_batch(&mut self, sql: &str) -> DbResult<()>;
}

/// Factory that opens a new connection per call, no pooling or reuse
pub trait ConnectionProvider {
    type Conn: Connection;

    fn get_connection(&self) -> DbResult<Self::Conn>;

    fn dialect(&self) -> Dialect;
}

impl<T: ConnectionProvider + ?Sized> ConnectionProvider for &T {
    type Conn = T::Conn;

    fn get_connection(&self) -> DbResult<Self::Conn> {
        (**self).get_connection()
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}

impl<T: ConnectionProvider + ?Sized> ConnectionProvider for Arc<T> {
    type Conn = T::Conn;

    fn get_connection(&self) -> DbResult<Self::Conn> {
        (**self).get_connection()
    }

    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }
}
