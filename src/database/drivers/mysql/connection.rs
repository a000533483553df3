//! MySQL connection implementation.
//!
//! This module implements the `Driver` trait for MySQL / MariaDB
//! using a single SQLx `MySqlConnection`.

use smol::block_on;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlQueryResult};
use sqlx::{Column, Connection, Executor, Statement};

use super::types::MySqlValueConverter;
use crate::database::error::{DbError, Result};
use crate::database::query::{BoundQuery, Dialect};
use crate::database::traits::{
    BoxedDriver, ColumnMap, ConnectionConfig, ConnectionParams, DatabaseType, Driver, ResultSet,
};

/// MySQL database driver.
///
/// Wraps one SQLx `MySqlConnection`. The handshake happens in
/// [`connect`](MySqlDriver::connect); a driver value always holds a live session.
pub struct MySqlDriver {
    config: ConnectionConfig,
    conn: MySqlConnection,
    last_insert_id: Option<i64>,
}

impl std::fmt::Debug for MySqlDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MySqlDriver")
            .field("config", &self.config)
            .field("conn", &"<MySqlConnection>")
            .field("last_insert_id", &self.last_insert_id)
            .finish()
    }
}

impl MySqlDriver {
    /// Connect to the server described by `config`.
    ///
    /// # Errors
    ///
    /// - `Config` if `config` does not carry server parameters
    /// - `Connection` if the handshake fails (bad credentials, unreachable host, ...)
    pub fn connect(config: ConnectionConfig) -> Result<Self> {
        config.validate()?;
        let options = Self::build_connect_options(&config)?;

        let conn = block_on(MySqlConnection::connect_with(&options))
            .map_err(|e| DbError::connection(DatabaseType::MySQL, e))?;

        let driver = Self {
            config,
            conn,
            last_insert_id: None,
        };
        tracing::info!(database = %driver.display_name(), "mysql: connected");
        Ok(driver)
    }

    /// Connect and box the driver (for factory use).
    pub fn boxed(config: ConnectionConfig) -> Result<BoxedDriver> {
        Ok(Box::new(Self::connect(config)?))
    }

    /// Build MySqlConnectOptions from the configuration.
    fn build_connect_options(config: &ConnectionConfig) -> Result<MySqlConnectOptions> {
        match &config.params {
            ConnectionParams::Server {
                hostname,
                port,
                username,
                password,
                database,
                ssl_mode,
            } => {
                let mut options = MySqlConnectOptions::new()
                    .host(hostname)
                    .port(*port)
                    .username(username)
                    .ssl_mode(MySqlValueConverter::map_ssl_mode(*ssl_mode));

                if !password.is_empty() {
                    options = options.password(password);
                }
                if !database.is_empty() {
                    options = options.database(database);
                }

                Ok(options)
            }
            ConnectionParams::File { .. } | ConnectionParams::InMemory => Err(DbError::Config(
                "MySQL does not support file-based or in-memory connections".to_string(),
            )),
        }
    }

    /// Prepare, bind and execute a statement that returns no rows.
    async fn execute_bound(
        conn: &mut MySqlConnection,
        bound: &BoundQuery,
    ) -> Result<MySqlQueryResult> {
        let statement = (&mut *conn)
            .prepare(&bound.sql)
            .await
            .map_err(|e| DbError::prepare(&bound.sql, e))?;

        MySqlValueConverter::bind_all(statement.query(), &bound.params)
            .execute(&mut *conn)
            .await
            .map_err(|e| DbError::exec(&bound.sql, e))
    }

    /// Prepare, bind and run a SELECT, materializing every row.
    async fn fetch_bound(conn: &mut MySqlConnection, bound: &BoundQuery) -> Result<ResultSet> {
        let statement = (&mut *conn)
            .prepare(&bound.sql)
            .await
            .map_err(|e| DbError::prepare(&bound.sql, e))?;

        let columns = statement
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect();

        let mysql_rows = MySqlValueConverter::bind_all(statement.query(), &bound.params)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| DbError::exec(&bound.sql, e))?;

        let rows = mysql_rows
            .iter()
            .map(MySqlValueConverter::convert_row)
            .collect();

        Ok(ResultSet::new(columns, rows))
    }

    /// `LAST_INSERT_ID` as reported in the OK packet. Zero means the table has
    /// no AUTO_INCREMENT column, so no key was generated.
    fn generated_id(raw: u64) -> Option<i64> {
        match raw {
            0 => None,
            id => i64::try_from(id).ok(),
        }
    }
}

impl Driver for MySqlDriver {
    fn database_type(&self) -> DatabaseType {
        DatabaseType::MySQL
    }

    fn connection_config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn insert(&mut self, table: &str, data: &ColumnMap) -> Result<bool> {
        let bound = Dialect::MYSQL.insert(table, data)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "mysql: insert");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        self.last_insert_id = Self::generated_id(done.last_insert_id());

        Ok(done.rows_affected() > 0)
    }

    /// SQLx always connects with `CLIENT_FOUND_ROWS`, so the server reports
    /// matched rows, not changed rows: an update that rewrites a row with the
    /// values it already holds still returns `true`.
    fn update(&mut self, table: &str, data: &ColumnMap, filter: &ColumnMap) -> Result<bool> {
        let bound = Dialect::MYSQL.update(table, data, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "mysql: update");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = done.rows_affected(), "mysql: update done");

        Ok(done.rows_affected() > 0)
    }

    fn delete(&mut self, table: &str, filter: &ColumnMap) -> Result<bool> {
        let bound = Dialect::MYSQL.delete(table, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "mysql: delete");

        let done = block_on(Self::execute_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = done.rows_affected(), "mysql: delete done");

        Ok(done.rows_affected() > 0)
    }

    fn get(&mut self, table: &str, filter: Option<&ColumnMap>) -> Result<ResultSet> {
        let bound = Dialect::MYSQL.select(table, filter)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "mysql: select");

        let result = block_on(Self::fetch_bound(&mut self.conn, &bound))?;
        tracing::debug!(rows = result.len(), "mysql: select done");

        Ok(result)
    }

    fn execute(&mut self, sql: &str) -> Result<u64> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(DbError::invalid_argument("empty statement"));
        }
        tracing::debug!(sql, "mysql: execute");

        let done = block_on((&mut self.conn).execute(sql)).map_err(|e| DbError::exec(sql, e))?;
        Ok(done.rows_affected())
    }

    fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    fn close(self: Box<Self>) -> Result<()> {
        let name = self.display_name();
        let this = *self;
        block_on(this.conn.close()).map_err(|e| DbError::close(DatabaseType::MySQL, e))?;
        tracing::info!(database = %name, "mysql: closed");
        Ok(())
    }
}
