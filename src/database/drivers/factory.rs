//! Driver factory for creating database drivers.
//!
//! The factory picks the adapter matching the configuration's database type
//! and opens its connection.

use super::mysql::MySqlDriver;
use super::sqlite::SqliteDriver;
use crate::database::error::Result;
use crate::database::traits::{BoxedDriver, ConnectionConfig, DatabaseType};

/// Factory for creating drivers based on configuration.
///
/// # Example
///
/// ```no_run
/// use dbshim::{ConnectionConfig, DriverFactory};
///
/// # fn main() -> dbshim::Result<()> {
/// let driver = DriverFactory::connect(ConnectionConfig::sqlite("shop.db"))?;
/// assert_eq!(driver.display_name(), "shop.db");
/// # Ok(())
/// # }
/// ```
pub struct DriverFactory;

impl DriverFactory {
    /// Open a driver for `config`.
    ///
    /// # Errors
    ///
    /// - `Config` if the parameters do not fit the database type
    /// - `Connection` if the connection cannot be established
    pub fn connect(config: ConnectionConfig) -> Result<BoxedDriver> {
        config.validate()?;

        tracing::debug!(driver = config.database_type.driver_name(), "factory: connecting");
        match config.database_type {
            DatabaseType::MySQL => MySqlDriver::boxed(config),
            DatabaseType::SQLite => SqliteDriver::boxed(config),
        }
    }

    /// Check if a database type has a driver implementation.
    pub fn is_supported(db_type: DatabaseType) -> bool {
        match db_type {
            DatabaseType::MySQL => true,
            DatabaseType::SQLite => true,
        }
    }

    /// Get a list of all supported database types.
    pub fn supported_types() -> Vec<DatabaseType> {
        DatabaseType::all()
            .into_iter()
            .filter(|t| Self::is_supported(*t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::error::DbError;
    use crate::database::traits::ConnectionParams;

    #[test]
    fn test_all_types_supported() {
        assert!(DriverFactory::is_supported(DatabaseType::MySQL));
        assert!(DriverFactory::is_supported(DatabaseType::SQLite));
        assert_eq!(
            DriverFactory::supported_types(),
            vec![DatabaseType::MySQL, DatabaseType::SQLite]
        );
    }

    #[test]
    fn test_connect_sqlite_in_memory() {
        let driver = DriverFactory::connect(ConnectionConfig::sqlite_in_memory()).unwrap();
        assert_eq!(driver.database_type(), DatabaseType::SQLite);
        assert_eq!(driver.last_insert_id(), None);
        driver.close().unwrap();
    }

    #[test]
    fn test_boxed_driver_is_debug() {
        let driver = DriverFactory::connect(ConnectionConfig::sqlite_in_memory()).unwrap();
        let rendered = format!("{driver:?}");
        assert!(rendered.starts_with("SqliteDriver"));
        assert!(rendered.contains("InMemory"));
        driver.close().unwrap();
    }

    #[test]
    fn test_mismatched_params_rejected_before_connecting() {
        let config = ConnectionConfig::new(DatabaseType::MySQL, ConnectionParams::InMemory);
        let err = DriverFactory::connect(config).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));

        let config = ConnectionConfig::new(
            DatabaseType::SQLite,
            ConnectionParams::server(
                "localhost".to_string(),
                3306,
                "root".to_string(),
                String::new(),
                "shop".to_string(),
            ),
        );
        let err = DriverFactory::connect(config).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }
}
