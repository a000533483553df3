//! Core driver trait and the result set returned by `get`.
//!
//! This module defines the `Driver` trait that every backend adapter implements,
//! as well as `ResultSet`, the owned cursor value produced by a SELECT.

use serde::Serialize;

use super::row::{ColumnMap, Row};
use super::types::{ConnectionConfig, ConnectionParams, DatabaseType};
use crate::database::error::Result;

/// Rows produced by one `get()` call.
///
/// The result set owns its rows, so it stays valid after the driver runs
/// other statements. Consume it with [`row`](ResultSet::row) or
/// [`result`](ResultSet::result), or iterate it directly.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSet {
    /// Column names reported by the prepared statement (present even with zero rows)
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Create a new result set
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// The first row, or `None` when nothing matched
    pub fn row(self) -> Option<Row> {
        self.rows.into_iter().next()
    }

    /// Every row, in the order the store returned them
    pub fn result(self) -> Vec<Row> {
        self.rows
    }

    /// Column names of the SELECT, in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows fetched
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the SELECT matched nothing
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow the rows without consuming the result set
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Core trait for all backend drivers.
///
/// A driver owns exactly one live connection, opened when the driver is
/// built. All methods block until the store answers. Methods take `&mut self`:
/// one connection serves one caller at a time. Drivers are `Debug` so a boxed
/// driver can be logged and inspected like any other value.
///
/// # Example
///
/// ```no_run
/// use dbshim::{ColumnMap, ConnectionConfig, Driver, SqliteDriver};
///
/// # fn main() -> dbshim::Result<()> {
/// let mut driver = SqliteDriver::connect(ConnectionConfig::sqlite("shop.db"))?;
/// driver.insert("products", &ColumnMap::new().with("title", "A").with("price", 10))?;
///
/// let filter = ColumnMap::new().with("title", "A");
/// if let Some(row) = driver.get("products", Some(&filter))?.row() {
///     println!("price = {:?}", row.get("price"));
/// }
/// # Ok(())
/// # }
/// ```
pub trait Driver: Send + std::fmt::Debug {
    /// Get the database type for this driver
    fn database_type(&self) -> DatabaseType;

    /// Get the connection configuration
    fn connection_config(&self) -> &ConnectionConfig;

    /// Insert one row.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `data` is empty
    /// - `Prepare` / `Exec` if the store rejects the statement
    fn insert(&mut self, table: &str, data: &ColumnMap) -> Result<bool>;

    /// Update the rows matching every `filter` column.
    ///
    /// Returns `true` iff at least one row matched `filter` and was written.
    /// A statement that matched nothing returns `Ok(false)`, not an error.
    /// Rewriting a row with the values it already holds still counts as a
    /// write on both backends.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `data` or `filter` is empty, before any SQL is built
    /// - `Prepare` / `Exec` if the store rejects the statement
    fn update(&mut self, table: &str, data: &ColumnMap, filter: &ColumnMap) -> Result<bool>;

    /// Delete the rows matching every `filter` column.
    ///
    /// Returns `true` iff at least one row was removed.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `filter` is empty; an unconditioned delete is never sent
    /// - `Prepare` / `Exec` if the store rejects the statement
    fn delete(&mut self, table: &str, filter: &ColumnMap) -> Result<bool>;

    /// Select the rows of `table` matching every `filter` column (all rows when
    /// `filter` is `None` or empty).
    ///
    /// # Errors
    ///
    /// - `Prepare` if the statement cannot be compiled (e.g. unknown table)
    /// - `Exec` if fetching the rows fails
    fn get(&mut self, table: &str, filter: Option<&ColumnMap>) -> Result<ResultSet>;

    /// Run a caller-authored statement that takes no parameters (DDL, fixtures).
    ///
    /// Returns the number of rows affected.
    fn execute(&mut self, sql: &str) -> Result<u64>;

    /// Key generated by the most recent successful `insert`, if any.
    fn last_insert_id(&self) -> Option<i64>;

    /// Close the connection, reporting any error the store raises while doing so.
    fn close(self: Box<Self>) -> Result<()>;

    /// Get a display name for the current connection.
    ///
    /// Returns "user@host:port/database" for server connections, the file path
    /// for file-based connections and ":memory:" for in-memory ones.
    fn display_name(&self) -> String {
        match &self.connection_config().params {
            ConnectionParams::Server {
                hostname,
                port,
                username,
                database,
                ..
            } => format!("{}@{}:{}/{}", username, hostname, port, database),
            ConnectionParams::File { path } => path.display().to_string(),
            ConnectionParams::InMemory => ":memory:".to_string(),
        }
    }
}

/// A boxed driver trait object.
pub type BoxedDriver = Box<dyn Driver>;
