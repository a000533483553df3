//! Driver type definitions and connection configuration.
//!
//! This module contains:
//! - `DatabaseType` - Enum of supported backend drivers
//! - `ConnectionConfig` - Typed connection configuration consumed by the drivers
//! - `ConnectionParams` - Server, file or in-memory connection parameters
//! - `SslMode` - Transport security for server connections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::database::error::DbError;

/// Supported backend drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// Networked MySQL / MariaDB client
    MySQL,
    /// Embedded, file-backed SQLite
    #[default]
    SQLite,
}

impl DatabaseType {
    /// Get the display name for this database type
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }

    /// Get the default port for server-based databases
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::MySQL => Some(3306),
            Self::SQLite => None,
        }
    }

    /// Get all available database types
    pub fn all() -> Vec<DatabaseType> {
        vec![Self::MySQL, Self::SQLite]
    }

    /// Canonical driver name, as accepted in `DB_CONNECTION`
    pub fn driver_name(&self) -> &'static str {
        match self {
            Self::MySQL => "mysqli",
            Self::SQLite => "sqlite3",
        }
    }
}

impl FromStr for DatabaseType {
    type Err = DbError;

    /// Parse a driver name. Accepts the classic `mysqli` / `sqlite3` names and
    /// their common aliases, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysqli" | "mysql" | "mariadb" => Ok(Self::MySQL),
            "sqlite3" | "sqlite" => Ok(Self::SQLite),
            _ => Err(DbError::UnsupportedDriver(s.to_string())),
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// SSL mode options for server connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SslMode {
    /// No SSL connection
    Disable,
    /// Try SSL first, fall back to non-SSL
    #[default]
    Prefer,
    /// Require SSL, don't verify certificates
    Require,
    /// Require SSL and verify server certificate
    VerifyCa,
    /// Require SSL, verify certificate and hostname
    VerifyFull,
}

impl FromStr for SslMode {
    type Err = DbError;

    /// Parse the kebab-case name used in configuration, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "disable" => Ok(Self::Disable),
            "prefer" => Ok(Self::Prefer),
            "require" => Ok(Self::Require),
            "verify-ca" => Ok(Self::VerifyCa),
            "verify-full" => Ok(Self::VerifyFull),
            _ => Err(DbError::Config(format!(
                "unknown SSL mode {s:?}, expected one of disable, prefer, require, verify-ca, verify-full"
            ))),
        }
    }
}

/// Typed connection configuration handed to a driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// The driver to use
    pub database_type: DatabaseType,
    /// Connection parameters (varies by driver)
    pub params: ConnectionParams,
}

impl ConnectionConfig {
    /// Create a new connection configuration
    pub fn new(database_type: DatabaseType, params: ConnectionParams) -> Self {
        Self {
            database_type,
            params,
        }
    }

    /// SQLite database at `path`
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self::new(DatabaseType::SQLite, ConnectionParams::file(path.into()))
    }

    /// Private in-memory SQLite database
    pub fn sqlite_in_memory() -> Self {
        Self::new(DatabaseType::SQLite, ConnectionParams::InMemory)
    }

    /// Validate that the params match the database type
    pub fn validate(&self) -> Result<(), DbError> {
        match (&self.database_type, &self.params) {
            (DatabaseType::SQLite, ConnectionParams::Server { .. }) => Err(DbError::Config(format!(
                "{} requires file or in-memory connection parameters",
                self.database_type.display_name()
            ))),
            (DatabaseType::MySQL, ConnectionParams::File { .. } | ConnectionParams::InMemory) => {
                Err(DbError::Config(format!(
                    "{} requires server connection parameters",
                    self.database_type.display_name()
                )))
            }
            _ => Ok(()),
        }
    }
}

/// Connection parameters for the different drivers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionParams {
    /// Server-based databases (MySQL)
    Server {
        /// Server hostname or IP address
        hostname: String,
        /// Server port
        port: u16,
        /// Username for authentication
        username: String,
        /// Password for authentication
        #[serde(skip_serializing, default)]
        password: String,
        /// Database/schema to connect to
        database: String,
        /// SSL mode for the connection
        #[serde(default)]
        ssl_mode: SslMode,
    },

    /// File-based databases (SQLite)
    File {
        /// Path to the database file
        path: PathBuf,
    },

    /// Private in-memory database, gone when the connection closes
    InMemory,
}

impl ConnectionParams {
    /// Create new server connection parameters
    pub fn server(
        hostname: String,
        port: u16,
        username: String,
        password: String,
        database: String,
    ) -> Self {
        Self::Server {
            hostname,
            port,
            username,
            password,
            database,
            ssl_mode: SslMode::default(),
        }
    }

    /// Create new file connection parameters
    pub fn file(path: PathBuf) -> Self {
        Self::File { path }
    }

    /// Get the hostname if this is a server connection
    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::Server { hostname, .. } => Some(hostname),
            _ => None,
        }
    }

    /// Get the file path if this is a file connection
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::File { path } => Some(path),
            _ => None,
        }
    }
}
