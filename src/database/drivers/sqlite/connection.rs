//! SQLite connection implementation.
//!
//! This module implements the `Driver` trait for SQLite using a single
//! SQLx `SqliteConnection`, driven to completion on the calling thread.

use smol::block_on;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteQueryResult};
use sqlx::{Column, Connection, Executor, Statement};
use std::path::Path;
use std::str::FromStr;

use super::types::SqliteValueConverter;
use crate::database::error::{DbError, Result};
use crate::database::query::{BoundQuery, Dialect};
use crate::database::traits::{
    BoxedDriver, ColumnMap, ConnectionConfig, ConnectionParams, DatabaseType, Driver, ResultSet,
};

/// SQLite database driver.
///
/// Wraps one SQLx `SqliteConnection`, opened on construction. The database file
/// is created if it does not exist yet.
pub struct SqliteDriver {
    config: ConnectionConfig,
    conn: SqliteConnection,
    last_insert_id: Option<i64>,
}

impl std::fmt::Debug for SqliteDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDriver")
            .field("config", &self.config)
            .field("conn", &"<SqliteConnection>")
            .field("last_insert_id", &self.last_insert_id)
            .finish()
    }
}

impl SqliteDriver {
    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// - `Config` if `config` does not describe a file or in-memory database
    /// - `Connection` if the file cannot be opened
    pub fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let options = Self::build_connect_options(&config)?;

        let conn = block_on(SqliteConnection::connect_with(&options))
            .map_err(|e| DbError::connection(DatabaseType::SQLite, e))?;

        let driver = Self {
            config,
            conn,
            last_insert_id: None,
        };
        tracing::info!(database = %driver.display_name(), "sqlite: connected");
        Ok(driver)
    }

    /// Open a connection and box it (for factory use).
    pub fn boxed(config: ConnectionConfig) -> Result<BoxedDriver> {
        Ok(Box::new(Self::connect(config)?))
    }

    /// Build SqliteConnectOptions from the configuration.
    ///
    /// An empty path or `:memory:` opens a private in-memory database.
    fn build_connect_options(config: &ConnectionConfig) -> Result<SqliteConnectOptions> {
        match &config.params {
            ConnectionParams::File { path } if !Self::is_memory_path(path) => {
                Ok(SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .foreign_keys(true))
            }
            ConnectionParams::File { .. } | ConnectionParams::InMemory => {
                SqliteConnectOptions::from_str(":memory:")
                    .map(|options| options.foreign_keys(true))
                    .map_err(|e| DbError::Config(e.to_string()))
            }
            ConnectionParams::Server { .. } => Err(DbError::Config(
                "SQLite does not support server-based connections. Use File or InMemory params."
                    .to_string(),
            )),
        }
    }

    fn is_memory_path(path: &Path) -> bool {
        path.as_os_str().is_empty() || path == Path::new(":memory:")
    }

    /// Prepare, bind and execute a statement that returns no rows.
    ///
    /// The changed-row count comes back with the execution result itself, so it
    /// cannot be polluted by a later statement on the same connection.
    async fn execute_bound(
        conn: &mut SqliteConnection,
        bound: &BoundQuery,
    ) -> Result<SqliteQueryResult> {
        let statement = (&mut *conn)
            .prepare(&bound.sql)
            .await
            .map_err(|e| DbError::prepare(&bound.sql, e))?;

        SqliteValueConverter::bind_all(statement.query(), &bound.params)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::exec(&bound.sql, e))
    }

    /// Prepare, bind and run a SELECT, materializing every row.
    async fn fetch_bound(conn: &mut SqliteConnection, bound: &BoundQuery) -> Result<ResultSet> {
        let statement = (&mut *conn)
            .prepare(&bound.sql)
            .await
            .map_err(|e| DbError::prepare(&bound.sql, e))?;

        let columns = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let sqlite_rows = SqliteValueConverter::bind_all(statement.query(), &bound.params)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| DbError::exec(&bound.sql, e))?;

        let rows = sqlite_rows
            .iter()
            .map(SqliteValueConverter::convert_row)
            .collect();

        Ok(ResultSet::new(columns, rows))
    }
}

impl Driver for SqliteDriver {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn insert(&mut self, table: &str, data: &ColumnMap) -> Result<bool> {
        let bound = Dialect::SQLITE.insert(table, data)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "sqlite: insert");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        self.last_insert_id = Some(done.last_insert_rowid());

        Ok(done.rows_affected() > 0)
    }

    fn update(&mut self, table: &str, data: &ColumnMap, filter: &ColumnMap) -> Result<bool> {
        let bound = Dialect::SQLITE.update(table, data, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "sqlite: update");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = done.rows_affected(), "sqlite: update done");

        Ok(done.rows_affected() > 0)
    }

    fn delete(&mut self, table: &str, filter: &ColumnMap) -> Result<bool> {
        let bound = Dialect::SQLITE.delete(table, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "sqlite: delete");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = done.rows_affected(), "sqlite: delete done");

        Ok(done.rows_affected() > 0)
    }

    fn get(&mut self, table: &str, filter: Option<&ColumnMap>) -> Result<ResultSet> {
        let bound = Dialect::SQLITE.select(table, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "sqlite: select");

        let result = block_on(Self::fetch_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = result.len(), "sqlite: select done");

        Ok(result)
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(DbError::invalid_argument("empty statement"));
        }
        tracing::debug!(sql, "sqlite: execute");

        let done = block_on((&mut self.conn).execute(sql)).map_err(|e| DbError::exec(sql, e))?;
        Ok(done.rows_affected())
    }

    fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    fn close(self: Box<Self>) -> Result<()> {
        let name = self.display_name();
        let this = *self;
        block_on(this.conn.close()).map_err(|e| DbError::close(DatabaseType::SQLite, e))?;
        tracing::info!(database = %name, "sqlite: closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::traits::Value;
    use std::path::PathBuf;

    fn memory_driver() -> SqliteDriver {
        let mut driver = SqliteDriver::connect(ConnectionConfig::sqlite_in_memory()).unwrap();
        driver
            .execute(
                "CREATE TABLE products (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL UNIQUE,
                    price REAL,
                    stock INTEGER,
                    image BLOB
                )",
            )
            .unwrap();
        driver
    }

    fn product(title: &str, price: i64) -> ColumnMap {
        ColumnMap::new().with("title", title).with("price", price)
    }

    #[test]
    fn test_build_connect_options_file() {
        let config = ConnectionConfig::sqlite(PathBuf::from("/tmp/test.db"));
        assert!(SqliteDriver::build_connect_options(&config).is_ok());
    }

    #[test]
    fn test_build_connect_options_memory() {
        assert!(SqliteDriver::build_connect_options(&ConnectionConfig::sqlite_in_memory()).is_ok());
        assert!(SqliteDriver::is_memory_path(Path::new("")));
        assert!(SqliteDriver::is_memory_path(Path::new(":memory:")));
        assert!(!SqliteDriver::is_memory_path(Path::new("shop.db")));
    }

    #[test]
    fn test_server_params_rejected() {
        let config = ConnectionConfig::new(
            DatabaseType::SQLite,
            ConnectionParams::server(
                "localhost".to_string(),
                3306,
                "user".to_string(),
                "pass".to_string(),
                "db".to_string(),
            ),
        );

        let err = SqliteDriver::connect(config).unwrap_err();
        assert!(matches!(err, DbError::Config(_)));
    }

    #[test]
    fn test_connect_to_unreachable_path_fails_fast() {
        let config = ConnectionConfig::sqlite("/nonexistent-dir/for/sure/shop.db");
        let err = SqliteDriver::connect(config).unwrap_err();
        assert!(matches!(err, DbError::Connection { driver: DatabaseType::SQLite, .. }));
    }

    #[test]
    fn test_insert_then_get_row() {
        let mut driver = memory_driver();
        assert!(driver.insert("products", &product("A", 10)).unwrap());
        assert_eq!(driver.last_insert_id(), Some(1));

        let row = driver
            .get("products", Some(&ColumnMap::new().with("title", "A")))
            .unwrap()
            .row()
            .unwrap();

        assert_eq!(row.get("title"), Some(&Value::Text("A".to_string())));
        // REAL affinity turns the bound integer into a float
        assert_eq!(row.get("price"), Some(&Value::Float(10.0)));
        assert_eq!(row.get("stock"), Some(&Value::Null));
    }

    #[test]
    fn test_get_without_filter_returns_all_rows_in_order() {
        let mut driver = memory_driver();
        for (title, price) in [("A", 10), ("B", 20), ("C", 30)] {
            driver.insert("products", &product(title, price)).unwrap();
        }

        let set = driver.get("products", None).unwrap();
        assert_eq!(set.columns(), ["id", "title", "price", "stock", "image"]);

        let titles: Vec<_> = set
            .result()
            .iter()
            .map(|row| row.get("title").unwrap().to_display_string())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_get_no_match_yields_none() {
        let mut driver = memory_driver();
        let set = driver
            .get("products", Some(&ColumnMap::new().with("title", "ghost")))
            .unwrap();
        assert!(set.is_empty());
        assert!(set.row().is_none());
    }

    #[test]
    fn test_update_reports_changed_rows() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        let changed = driver
            .update(
                "products",
                &ColumnMap::new().with("title", "Z").with("stock", 5),
                &ColumnMap::new().with("title", "A"),
            )
            .unwrap();
        assert!(changed);

        let unchanged = driver
            .update(
                "products",
                &ColumnMap::new().with("title", "Y"),
                &ColumnMap::new().with("title", "A"),
            )
            .unwrap();
        assert!(!unchanged);

        let row = driver.get("products", None).unwrap().row().unwrap();
        assert_eq!(row.get("title"), Some(&Value::Text("Z".to_string())));
        assert_eq!(row.get("stock"), Some(&Value::Int(5)));
    }

    #[test]
    fn test_update_with_current_values_counts_the_row() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        let rewritten = driver
            .update(
                "products",
                &ColumnMap::new().with("title", "A"),
                &ColumnMap::new().with("title", "A"),
            )
            .unwrap();
        assert!(rewritten);
    }

    #[test]
    fn test_update_same_column_in_set_and_where() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();
        driver.insert("products", &product("B", 20)).unwrap();

        driver
            .update(
                "products",
                &ColumnMap::new().with("price", 99),
                &ColumnMap::new().with("price", 20),
            )
            .unwrap();

        let a = driver
            .get("products", Some(&ColumnMap::new().with("title", "A")))
            .unwrap()
            .row()
            .unwrap();
        let b = driver
            .get("products", Some(&ColumnMap::new().with("title", "B")))
            .unwrap()
            .row()
            .unwrap();
        assert_eq!(a.get("price"), Some(&Value::Float(10.0)));
        assert_eq!(b.get("price"), Some(&Value::Float(99.0)));
    }

    #[test]
    fn test_delete_zero_match_is_false_not_error() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        assert!(!driver
            .delete("products", &ColumnMap::new().with("title", "nonexistent"))
            .unwrap());
        assert!(driver
            .delete("products", &ColumnMap::new().with("title", "A"))
            .unwrap());
        assert!(driver.get("products", None).unwrap().is_empty());
    }

    #[test]
    fn test_unconditioned_mutations_rejected() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        let err = driver.delete("products", &ColumnMap::new()).unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = driver
            .update("products", &ColumnMap::new().with("title", "Z"), &ColumnMap::new())
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        let err = driver
            .update("products", &ColumnMap::new(), &ColumnMap::new().with("title", "A"))
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));

        assert_eq!(driver.get("products", None).unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_table_is_prepare_error() {
        let mut driver = memory_driver();
        let err = driver.get("missing", None).unwrap_err();
        assert!(matches!(err, DbError::Prepare { .. }));

        let err = driver.insert("missing", &product("A", 1)).unwrap_err();
        assert!(matches!(err, DbError::Prepare { .. }));
    }

    #[test]
    fn test_constraint_violation_is_exec_error() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        let err = driver.insert("products", &product("A", 11)).unwrap_err();
        assert!(matches!(err, DbError::Exec { .. }));
    }

    #[test]
    fn test_values_keep_their_kind() {
        let mut driver = memory_driver();
        driver
            .insert(
                "products",
                &ColumnMap::new()
                    .with("title", "blob")
                    .with("price", 2.5)
                    .with("stock", 7)
                    .with("image", vec![0xDE_u8, 0xAD])
                    .with("id", 42),
            )
            .unwrap();
        assert_eq!(driver.last_insert_id(), Some(42));

        let row = driver
            .get("products", Some(&ColumnMap::new().with("id", 42)))
            .unwrap()
            .row()
            .unwrap();
        assert_eq!(row.get("price"), Some(&Value::Float(2.5)));
        assert_eq!(row.get("stock"), Some(&Value::Int(7)));
        assert_eq!(row.get("image"), Some(&Value::Bytes(vec![0xDE, 0xAD])));
    }

    #[test]
    fn test_null_binding() {
        let mut driver = memory_driver();
        driver
            .insert(
                "products",
                &ColumnMap::new().with("title", "A").with("stock", Value::Null),
            )
            .unwrap();

        let row = driver.get("products", None).unwrap().row().unwrap();
        assert!(row.get("stock").unwrap().is_null());
    }

    #[test]
    fn test_injection_attempt_is_just_a_value() {
        let mut driver = memory_driver();
        driver.insert("products", &product("A", 10)).unwrap();

        let removed = driver
            .delete("products", &ColumnMap::new().with("title", "x' OR '1'='1"))
            .unwrap();
        assert!(!removed);
        assert_eq!(driver.get("products", None).unwrap().len(), 1);
    }

    #[test]
    fn test_execute_rejects_empty_statement() {
        let mut driver = memory_driver();
        assert!(matches!(driver.execute("   "), Err(DbError::InvalidArgument(_))));
    }

    #[test]
    fn test_display_name_and_close() {
        let driver = SqliteDriver::connect(ConnectionConfig::sqlite_in_memory()).unwrap();
        assert_eq!(driver.display_name(), ":memory:");
        assert_eq!(driver.database_type(), DatabaseType::SQLite);

        let boxed: BoxedDriver = Box::new(driver);
        boxed.close().unwrap();
    }
}
