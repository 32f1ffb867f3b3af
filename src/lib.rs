//! Client Store - repository layer over a relational database
//!
//! A [`ConnectionProvider`](db::ConnectionProvider) turns an immutable
//! [`ConnectionConfig`](config::ConnectionConfig) into a fresh connection per
//! operation, and [`ClientRepository`](db::ClientRepository) maps the
//! client operations onto parameterized SQL.

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{Backend, ConfigError, ConnectionConfig};
pub use db::{ClientRepository, ConnectionProvider, DbError, DbResult};
pub use error::{AppError, AppResult};
pub use types::*;
