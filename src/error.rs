//! Error types and result aliases for Client Store

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unsupported backend: {0}")]
    UnsupportedBackend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    /// Stable code for the error category
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(e) if e.is_connection_error() => "CONNECTION_ERROR",
            AppError::Database(_) => "QUERY_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::UnsupportedBackend(_) => "UNSUPPORTED_BACKEND",
            AppError::Io(_) => "IO_ERROR",
            AppError::Json(_) => "JSON_ERROR",
        }
    }

    /// Report for the binary's exit path: the category code, caused by this error
    pub fn into_report(self) -> anyhow::Error {
        let code = self.code();
        anyhow::Error::new(self).context(code)
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;
