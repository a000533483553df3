//! Driver abstraction traits and types.
//!
//! This module provides a unified interface over the supported backends.
//! It defines:
//!
//! - **Types** (`types`): Driver enum, connection configuration, SSL modes
//! - **Row/Value** (`row`): Driver-agnostic values, column maps and rows
//! - **Connection** (`connection`): The `Driver` trait and the `ResultSet` it returns
//!
//! # Example
//!
//! ```ignore
//! use dbshim::database::traits::{ConnectionConfig, ConnectionParams, DatabaseType};
//!
//! // MySQL connection config
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
//! ```

pub mod connection;
pub mod row;
pub mod types;

pub use connection::{BoxedDriver, Driver, ResultSet};

pub use row::{Cell, ColumnMap, Row, Value};

pub use types::{ConnectionConfig, ConnectionParams, DatabaseType, SslMode};
