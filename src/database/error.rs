//! Error types for the data-access layer.
//!
//! Every operation returns [`DbError`] on failure. The variants separate
//! failures the caller caused (`InvalidArgument`, `UnsupportedDriver`, `Config`)
//! from failures the store reported (`Connection`, `Prepare`, `Exec`, `Close`).

use thiserror::Error;

use super::traits::DatabaseType;

/// Errors that can occur in the data-access layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// The connection could not be established when the driver was built.
    #[error("{driver} connection failed: {source}")]
    Connection {
        driver: DatabaseType,
        #[source]
        source: sqlx::Error,
    },

    /// The store refused to compile the statement (unknown table or column, bad syntax).
    #[error("prepare failed for `{sql}`: {source}")]
    Prepare {
        sql: String,
        #[source]
        source: sqlx::Error,
    },

    /// The store rejected the statement while executing it or fetching its rows.
    #[error("execute failed for `{sql}`: {source}")]
    Exec {
        sql: String,
        #[source]
        source: sqlx::Error,
    },

    /// The store reported an error while the connection was being shut down.
    #[error("{driver} close failed: {source}")]
    Close {
        driver: DatabaseType,
        #[source]
        source: sqlx::Error,
    },

    /// A safety precondition was violated; no statement was sent.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Unknown driver name.
    #[error("unsupported driver: {0}")]
    UnsupportedDriver(String),

    /// Connection parameters do not fit the selected driver.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The dispatcher has no driver yet.
    #[error("database not initialized, call Db::init() first")]
    NotInitialized,
}

impl DbError {
    pub(crate) fn connection(driver: DatabaseType, source: sqlx::Error) -> Self {
        Self::Connection { driver, source }
    }

    pub(crate) fn close(driver: DatabaseType, source: sqlx::Error) -> Self {
        Self::Close { driver, source }
    }

    pub(crate) fn prepare(sql: &str, source: sqlx::Error) -> Self {
        Self::Prepare {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn exec(sql: &str, source: sqlx::Error) -> Self {
        Self::Exec {
            sql: sql.to_string(),
            source,
        }
    }

    pub(crate) fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// True when the call was rejected before anything reached the store
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_) | Self::UnsupportedDriver(_) | Self::Config(_)
        )
    }
}

/// Result type alias using [`DbError`].
pub type Result<T> = std::result::Result<T, DbError>;
