//! Data-access layer.
//!
//! - `traits`: the `Driver` contract, values, rows and connection config
//! - `drivers`: MySQL and SQLite implementations plus the factory
//! - `query`: parameterized SQL construction shared by the drivers
//! - `dispatcher`: the `Db` client and per-table handles
//! - `config`: `DbConfig` and the `DB_*` environment fallback

pub mod config;
pub mod dispatcher;
pub mod drivers;
pub mod error;
pub mod query;
pub mod traits;

pub use config::DbConfig;
pub use dispatcher::{Db, Table};
pub use drivers::{DriverFactory, MySqlDriver, SqliteDriver};
pub use error::{DbError, Result};
pub use traits::{
    BoxedDriver, Cell, ColumnMap, ConnectionConfig, ConnectionParams, DatabaseType, Driver,
    ResultSet, Row, SslMode, Value,
};
