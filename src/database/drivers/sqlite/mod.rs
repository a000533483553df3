//! SQLite database driver implementation.
//!
//! This module provides the embedded, file-backed driver. It implements the
//! `Driver` trait over a single SQLx `SqliteConnection`.
//!
//! # Example
//!
//! ```ignore
//! use dbshim::database::drivers::sqlite::SqliteDriver;
//! use dbshim::database::traits::ConnectionConfig;
//!
//! let mut driver = SqliteDriver::connect(ConnectionConfig::sqlite("shop.db"))?;
//! let rows = driver.get("products", None)?.result();
//! ```

mod connection;
mod types;

pub use connection::SqliteDriver;
pub use types::SqliteValueConverter;
