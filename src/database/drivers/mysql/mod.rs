//! MySQL database driver implementation.
//!
//! This module provides the networked driver for MySQL and MariaDB. It
//! implements the `Driver` trait over a single SQLx `MySqlConnection`.
//!
//! # Example
//!
//! ```ignore
//! use dbshim::database::drivers::mysql::MySqlDriver;
//! use dbshim::database::traits::{ConnectionConfig, ConnectionParams, DatabaseType};
//!
//! let config = ConnectionConfig::new(
//!     DatabaseType::MySQL,
//!     ConnectionParams::server(
//!         "localhost".to_string(),
//!         3306,
//!         "user".to_string(),
//!         "password".to_string(),
//!         "shop".to_string(),
//!     ),
//! );
//!
//! let mut driver = MySqlDriver::connect(config)?;
//! let product = driver.get("products", None)?.row();
//! ```

mod connection;
mod types;

pub use connection::MySqlDriver;
pub use types::MySqlValueConverter;
