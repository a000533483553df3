//! Database driver implementations.
//!
//! This module contains driver implementations for the supported backends:
//!
//! - **MySQL**: networked MySQL/MariaDB support via SQLx
//! - **SQLite**: embedded, file-backed SQLite support via SQLx
//!
//! Each driver implements the `Driver` trait.

mod factory;

pub mod mysql;
pub mod sqlite;

pub use factory::DriverFactory;
pub use mysql::MySqlDriver;
pub use sqlite::SqliteDriver;
