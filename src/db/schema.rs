//! SQL dialects and the `client` table definition
//!
//! The table is expected to exist already; `create_client_table` is a
//! one-shot bootstrap for fresh databases, not a migration system.

use std::fmt;

use super::connection::{Connection, DbResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Mysql,
    Sqlite,
}

impl Dialect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Mysql => "mysql",
            Dialect::Sqlite => "sqlite",
        }
    }

    pub fn client_table_ddl(&self) -> &'static str {
        match self {
            Dialect::Mysql => MYSQL_CLIENT_TABLE,
            Dialect::Sqlite => SQLITE_CLIENT_TABLE,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MYSQL_CLIENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(64) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

const SQLITE_CLIENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS client (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Create the `client` table if it does not exist yet
pub fn create_client_table<C: Connection>(conn: &mut C, dialect: Dialect) -> DbResult<()> {
    tracing::info!("Ensuring client table exists ({})", dialect);
    conn.execute_batch(dialect.client_table_ddl())
}
