//! Connection configuration
//!
//! Read once at startup from the environment (and an optional `.env` file)
//! into an immutable [`ConnectionConfig`] that is handed to a provider.

use std::fmt;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_DATABASE: &str = "escola_demo";
pub const DEFAULT_PORT: u16 = 3306;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid DB_PORT '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("Unknown DB_BACKEND '{0}' (expected 'mysql' or 'sqlite')")]
    UnknownBackend(String),
    #[error("Cannot load .env file: {0}")]
    DotEnv(#[source] dotenvy::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Mysql,
    Sqlite,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Mysql => "mysql",
            Backend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for Backend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(Backend::Mysql),
            "sqlite" => Ok(Backend::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    backend: Backend,
    host: String,
    user: String,
    password: Option<String>,
    database: String,
    port: u16,
    sqlite_path: PathBuf,
}

impl ConnectionConfig {
    /// Load `.env` if present, then read `DB_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(path) = check_dotenv(dotenvy::dotenv())? {
            tracing::debug!("Loaded environment from {:?}", path);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match lookup("DB_BACKEND") {
            Some(value) => value.parse()?,
            None => Backend::Mysql,
        };

        let port = match lookup("DB_PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        let password = lookup("DB_PASS");
        if backend == Backend::Mysql && password.is_none() {
            return Err(ConfigError::Missing("DB_PASS"));
        }

        let database = lookup("DB_NAME").unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let sqlite_path = lookup("DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(format!("{}.db", database)));

        Ok(Self {
            backend,
            host: lookup("DB_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            user: lookup("DB_USER").unwrap_or_else(|| DEFAULT_USER.to_string()),
            password,
            database,
            port,
            sqlite_path,
        })
    }

    /// Config pointing at a SQLite database file
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Sqlite,
            host: DEFAULT_HOST.to_string(),
            user: DEFAULT_USER.to_string(),
            password: None,
            database: DEFAULT_DATABASE.to_string(),
            port: DEFAULT_PORT,
            sqlite_path: path.into(),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn check_dotenv<T>(result: dotenvy::Result<T>) -> Result<Option<T>, ConfigError> {
    match result {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(ConfigError::DotEnv(e)),
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("database", &self.database)
            .field("port", &self.port)
            .field("sqlite_path", &self.sqlite_path)
            .finish()
    }
}
