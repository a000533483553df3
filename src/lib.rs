//! A small synchronous data-access layer over MySQL and SQLite.
//!
//! [`Db`] holds one driver and forwards `insert`, `update`, `delete` and `get`
//! to it. Every value is bound as a statement parameter, and mutations without
//! a WHERE predicate are refused before any SQL is sent.
//!
//! ```no_run
//! use dbshim::{ColumnMap, Db, DbConfig};
//!
//! # fn main() -> dbshim::Result<()> {
//! let mut db = Db::connect(&DbConfig::sqlite("shop.db"))?;
//! db.insert("products", &ColumnMap::new().with("title", "A").with("price", 10))?;
//!
//! let cheap = db.get("products", Some(&ColumnMap::new().with("price", 10)))?.result();
//! db.update(
//!     "products",
//!     &ColumnMap::new().with("title", "Z"),
//!     &ColumnMap::new().with("title", "A"),
//! )?;
//! # Ok(())
//! # }
//! ```

pub mod database;

pub use database::{
    BoxedDriver, Cell, ColumnMap, ConnectionConfig, ConnectionParams, DatabaseType, Db, DbConfig,
    DbError, Driver, DriverFactory, MySqlDriver, ResultSet, Result, Row, SqliteDriver, SslMode,
    Table, Value,
};
