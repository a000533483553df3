//! Dispatcher initialisation config.
//!
//! [`DbConfig`] is the loose, string-keyed form an application hands to
//! [`Db::init`](crate::Db::init) or reads from the process environment. It is
//! turned into a typed [`ConnectionConfig`] once the driver name is known.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::error::{DbError, Result};
use super::traits::{ConnectionConfig, ConnectionParams, DatabaseType, SslMode};

/// Driver name (`mysqli`, `sqlite3`, ...)
pub const ENV_CONNECTION: &str = "DB_CONNECTION";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
/// Schema name for MySQL, file path for SQLite
pub const ENV_DATABASE: &str = "DB_DATABASE";
pub const ENV_USERNAME: &str = "DB_USERNAME";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
/// `disable`, `prefer`, `require`, `verify-ca` or `verify-full`
pub const ENV_SSL_MODE: &str = "DB_SSL_MODE";

const DEFAULT_DRIVER: &str = "sqlite3";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_USERNAME: &str = "root";

/// Connection settings keyed by driver name.
///
/// `dbname` is the schema name for MySQL and the file path for SQLite; an
/// empty `dbname` opens an in-memory SQLite database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub driver: String,
    pub host: String,
    pub port: Option<u16>,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub dbname: String,
    pub ssl_mode: SslMode,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            host: String::new(),
            port: None,
            username: String::new(),
            password: String::new(),
            dbname: String::new(),
            ssl_mode: SslMode::default(),
        }
    }
}

impl DbConfig {
    /// SQLite database at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        Self {
            driver: DatabaseType::SQLite.driver_name().to_string(),
            dbname: path.into(),
            ..Self::default()
        }
    }

    /// MySQL schema `dbname` on `host`.
    pub fn mysql(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        dbname: impl Into<String>,
    ) -> Self {
        Self {
            driver: DatabaseType::MySQL.driver_name().to_string(),
            host: host.into(),
            username: username.into(),
            password: password.into(),
            dbname: dbname.into(),
            ..Self::default()
        }
    }

    /// Override the server port (MySQL only).
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Override the transport security mode (MySQL only).
    pub fn with_ssl_mode(mut self, ssl_mode: SslMode) -> Self {
        self.ssl_mode = ssl_mode;
        self
    }

    /// Read the `DB_*` variables from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any `DB_*` key lookup. Empty values count as unset.
    ///
    /// # Errors
    ///
    /// `Config` if `DB_PORT` is not a valid port number or `DB_SSL_MODE` names
    /// no known mode.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(ENV_PORT) {
            Some(raw) => Some(raw.trim().parse::<u16>().map_err(|e| {
                DbError::Config(format!("{ENV_PORT}={raw:?} is not a valid port: {e}"))
            })?),
            None => None,
        };

        let ssl_mode = match get(ENV_SSL_MODE) {
            Some(raw) => raw.parse::<SslMode>()?,
            None => SslMode::default(),
        };

        Ok(Self {
            driver: get(ENV_CONNECTION).unwrap_or_else(|| DEFAULT_DRIVER.to_string()),
            host: get(ENV_HOST).unwrap_or_default(),
            port,
            username: get(ENV_USERNAME).unwrap_or_default(),
            password: get(ENV_PASSWORD).unwrap_or_default(),
            dbname: get(ENV_DATABASE).unwrap_or_default(),
            ssl_mode,
        })
    }

    /// Parse the driver name.
    pub fn database_type(&self) -> Result<DatabaseType> {
        self.driver.parse()
    }

    /// Resolve into the typed config a driver connects with.
    ///
    /// # Errors
    ///
    /// `UnsupportedDriver` if `driver` names no known backend.
    pub fn to_connection_config(&self) -> Result<ConnectionConfig> {
        let database_type = self.database_type()?;

        let params = match database_type {
            DatabaseType::MySQL => ConnectionParams::Server {
                hostname: non_empty_or(&self.host, DEFAULT_HOST),
                port: self
                    .port
                    .or(database_type.default_port())
                    .unwrap_or(3306),
                username: non_empty_or(&self.username, DEFAULT_USERNAME),
                password: self.password.clone(),
                database: self.dbname.clone(),
                ssl_mode: self.ssl_mode,
            },
            DatabaseType::SQLite if self.dbname.trim().is_empty() => ConnectionParams::InMemory,
            DatabaseType::SQLite => ConnectionParams::file(PathBuf::from(&self.dbname)),
        };

        Ok(ConnectionConfig::new(database_type, params))
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}
