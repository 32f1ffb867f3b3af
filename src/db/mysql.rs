//! MySQL backend, behind the default `mysql` cargo feature

use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Timelike};
use mysql::consts::CapabilityFlags;
use mysql::prelude::Queryable;
use mysql::{OptsBuilder, Params, TxOpts};

use super::connection::{Connection, ConnectionProvider, DbError, DbResult, Execution, Row, Value};
use super::schema::Dialect;
use crate::config::ConnectionConfig;

fn to_mysql(value: &Value) -> DbResult<mysql::Value> {
    Ok(match value {
        Value::Null => mysql::Value::NULL,
        Value::Int(v) => mysql::Value::Int(*v),
        Value::Float(v) => mysql::Value::Double(*v),
        Value::Text(s) => mysql::Value::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => mysql::Value::Bytes(b.clone()),
        Value::Timestamp(ts) => {
            let year = u16::try_from(ts.year()).map_err(|_| {
                DbError::query(format!("timestamp {} has a year MySQL cannot store", ts))
            })?;
            // A leap second shows up as nanosecond >= 1e9.
            mysql::Value::Date(
                year,
                ts.month() as u8,
                ts.day() as u8,
                ts.hour() as u8,
                ts.minute() as u8,
                ts.second() as u8,
                (ts.nanosecond() % 1_000_000_000) / 1_000,
            )
        }
    })
}

impl From<mysql::Value> for Value {
    fn from(value: mysql::Value) -> Self {
        match value {
            mysql::Value::NULL => Value::Null,
            mysql::Value::Int(v) => Value::Int(v),
            mysql::Value::UInt(v) => i64::try_from(v)
                .map(Value::Int)
                .unwrap_or_else(|_| Value::Text(v.to_string())),
            mysql::Value::Float(v) => Value::Float(f64::from(v)),
            mysql::Value::Double(v) => Value::Float(v),
            mysql::Value::Bytes(b) => match String::from_utf8(b) {
                Ok(s) => Value::Text(s),
                Err(e) => Value::Bytes(e.into_bytes()),
            },
            mysql::Value::Date(y, mo, d, h, mi, s, us) => {
                date_value(y, mo, d, h, mi, s, us).unwrap_or(Value::Null)
            }
            mysql::Value::Time(neg, days, h, mi, s, us) => Value::Text(format!(
                "{}{:02}:{:02}:{:02}.{:06}",
                if neg { "-" } else { "" },
                u32::from(h) + days * 24,
                mi,
                s,
                us
            )),
        }
    }
}

// MySQL zero dates ('0000-00-00') have no chrono representation.
fn date_value(y: u16, mo: u8, d: u8, h: u8, mi: u8, s: u8, us: u32) -> Option<Value> {
    NaiveDate::from_ymd_opt(i32::from(y), u32::from(mo), u32::from(d))
        .and_then(|date| date.and_hms_micro_opt(u32::from(h), u32::from(mi), u32::from(s), us))
        .map(Value::Timestamp)
}

fn to_params(params: &[Value]) -> DbResult<Params> {
    if params.is_empty() {
        Ok(Params::Empty)
    } else {
        Ok(Params::Positional(
            params.iter().map(to_mysql).collect::<DbResult<Vec<_>>>()?,
        ))
    }
}

/// Opens a new MySQL connection from the stored config on every call
#[derive(Debug, Clone)]
pub struct MysqlConnectionProvider {
    config: ConnectionConfig,
}

impl MysqlConnectionProvider {
    pub fn new(config: ConnectionConfig) -> Self {
        Self { config }
    }

    fn opts(&self) -> OptsBuilder {
        // Report matched rows rather than changed rows, so rewriting a value
        // with itself still counts as one affected row.
        OptsBuilder::new()
            .ip_or_hostname(Some(self.config.host()))
            .tcp_port(self.config.port())
            .user(Some(self.config.user()))
            .pass(self.config.password())
            .db_name(Some(self.config.database()))
            .additional_capabilities(CapabilityFlags::CLIENT_FOUND_ROWS)
    }
}

impl ConnectionProvider for MysqlConnectionProvider {
    type Conn = MysqlConnection;

    fn get_connection(&self) -> DbResult<MysqlConnection> {
        tracing::debug!(
            host = %self.config.host(),
            port = self.config.port(),
            database = %self.config.database(),
            user = %self.config.user(),
            "Opening MySQL connection"
        );

        let conn = mysql::Conn::new(self.opts()).map_err(DbError::connection)?;
        Ok(MysqlConnection { conn })
    }

    fn dialect(&self) -> Dialect {
        Dialect::Mysql
    }
}

pub struct MysqlConnection {
    conn: mysql::Conn,
}

impl std::fmt::Debug for MysqlConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MysqlConnection")
            .field("connection_id", &self.conn.connection_id())
            .finish()
    }
}

impl Connection for MysqlConnection {
    fn query(&mut self, sql: &str, params: &[Value]) -> DbResult<Vec<Row>> {
        tracing::debug!("mysql query: {}", sql.trim());

        let rows: Vec<mysql::Row> = self
            .conn
            .exec(sql, to_params(params)?)
            .map_err(DbError::query)?;

        let mut columns: Option<Arc<[String]>> = None;
        let mut result = Vec::with_capacity(rows.len());
        for mut row in rows {
            let names = columns
                .get_or_insert_with(|| {
                    row.columns_ref()
                        .iter()
                        .map(|c| c.name_str().into_owned())
                        .collect()
                })
                .clone();
            let values = (0..row.len())
                .map(|idx| {
                    row.take::<mysql::Value, _>(idx)
                        .map(Value::from)
                        .unwrap_or(Value::Null)
                })
                .collect();
            result.push(Row::new(names, values));
        }

        Ok(result)
    }

    fn execute(&mut self, sql: &str, params: &[Value]) -> DbResult<Execution> {
        tracing::debug!("mysql execute: {}", sql.trim());

        let params = to_params(params)?;
        let mut tx = self
            .conn
            .start_transaction(TxOpts::default())
            .map_err(DbError::query)?;
        tx.exec_drop(sql, params)
            .map_err(DbError::query)?;
        let affected_rows = tx.affected_rows();
        let last_insert_id = tx
            .last_insert_id()
            .filter(|id| *id != 0)
            .and_then(|id| i64::try_from(id).ok());
        tx.commit().map_err(DbError::query)?;

        Ok(Execution {
            affected_rows,
            last_insert_id,
        })
    }

    fn execute_batch(&mut self, sql: &str) -> DbResult<()> {
        self.conn.query_drop(sql).map_err(DbError::query)
    }
}
