//! Database layer for Client Store
//!
//! This module provides the connection abstraction, the SQLite and MySQL
//! backends, and the repository used for client data access.

pub mod connection;
#[cfg(feature = "mysql")]
pub mod mysql;
pub mod repositories;
pub mod schema;
pub mod sqlite;

pub use connection::{
    Connection, ConnectionProvider, DbError, DbResult, Execution, Row, Value,
};
#[cfg(feature = "mysql")]
pub use self::mysql::MysqlConnectionProvider;
pub use repositories::ClientRepository;
pub use schema::{create_client_table, Dialect};
pub use sqlite::SqliteConnectionProvider;
