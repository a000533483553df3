//! The `Db` client: one driver, many call sites.
//!
//! A [`Db`] holds at most one driver for its lifetime. The first successful
//! [`init`](Db::init) wins; later calls are ignored. Every verb makes sure a
//! driver is present, falling back to the `DB_*` environment variables when the
//! caller never initialised the client explicitly. Driver errors pass through
//! untouched.

use super::config::DbConfig;
use super::drivers::DriverFactory;
use super::error::{DbError, Result};
use super::traits::{BoxedDriver, ColumnMap, ConnectionConfig, Driver, ResultSet};

/// Database client forwarding CRUD calls to the driver it holds.
///
/// # Example
///
/// ```no_run
/// use dbshim::{ColumnMap, Db, DbConfig};
///
/// # fn main() -> dbshim::Result<()> {
/// let mut db = Db::connect(&DbConfig::sqlite("shop.db"))?;
/// db.insert("products", &ColumnMap::new().with("title", "A").with("price", 10))?;
///
/// let filter = ColumnMap::new().with("title", "A");
/// let product = db.get("products", Some(&filter))?.row();
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct Db {
    driver: Option<BoxedDriver>,
}

impl std::fmt::Debug for Db {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Db")
            .field("driver", &self.driver.as_ref().map(|d| d.display_name()))
            .finish()
    }
}

impl Db {
    /// An uninitialised client. The first verb initialises it from the environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct and initialise in one step.
    pub fn connect(config: &DbConfig) -> Result<Self> {
        let mut db = Self::new();
        db.init(config)?;
        Ok(db)
    }

    /// Wrap a driver that is already connected.
    pub fn from_driver(driver: BoxedDriver) -> Self {
        Self {
            driver: Some(driver),
        }
    }

    /// Select and connect the driver named by `config.driver`.
    ///
    /// Does nothing when a driver is already held, even if `config` differs.
    ///
    /// # Errors
    ///
    /// - `UnsupportedDriver` for an unknown driver name
    /// - `Connection` / `Config` from the driver
    pub fn init(&mut self, config: &DbConfig) -> Result<()> {
        if self.is_initialized() {
            tracing::warn!(driver = %config.driver, "db: already initialized, ignoring init");
            return Ok(());
        }
        self.init_with(config.to_connection_config()?)
    }

    /// Like [`init`](Db::init), from an already typed connection config.
    pub fn init_with(&mut self, config: ConnectionConfig) -> Result<()> {
        if let Some(driver) = &self.driver {
            tracing::warn!(
                current = %driver.display_name(),
                "db: already initialized, ignoring init"
            );
            return Ok(());
        }

        let driver = DriverFactory::connect(config)?;
        tracing::info!(
            driver = driver.database_type().driver_name(),
            database = %driver.display_name(),
            "db: initialized"
        );
        self.driver = Some(driver);
        Ok(())
    }

    /// Check whether a driver is held.
    pub fn is_initialized(&self) -> bool {
        self.driver.is_some()
    }

    /// The held driver. Never initialises.
    pub fn instance(&self) -> Result<&dyn Driver> {
        match self.driver.as_deref() {
            Some(driver) => Ok(driver),
            None => Err(DbError::NotInitialized),
        }
    }

    /// The held driver, mutably. Never initialises.
    pub fn instance_mut(&mut self) -> Result<&mut dyn Driver> {
        match self.driver.as_deref_mut() {
            Some(driver) => Ok(driver),
            None => Err(DbError::NotInitialized),
        }
    }

    fn ensure_initialized(&mut self) -> Result<&mut BoxedDriver> {
        if self.driver.is_none() {
            tracing::info!("db: not initialized, reading DB_* environment");
            let config = DbConfig::from_env()?;
            self.init(&config)?;
        }
        self.driver.as_mut().ok_or(DbError::NotInitialized)
    }

    /// Insert one row into `table`. See [`Driver::insert`].
    pub fn insert(&mut self, table: &str, data: &ColumnMap) -> Result<bool> {
        self.ensure_initialized()?.insert(table, data)
    }

    /// Update the rows of `table` matching `filter`. See [`Driver::update`].
    pub fn update(&mut self, table: &str, data: &ColumnMap, filter: &ColumnMap) -> Result<bool> {
        self.ensure_initialized()?.update(table, data, filter)
    }

    /// Delete the rows of `table` matching `filter`. See [`Driver::delete`].
    pub fn delete(&mut self, table: &str, filter: &ColumnMap) -> Result<bool> {
        self.ensure_initialized()?.delete(table, filter)
    }

    /// Select from `table`. Chain `.row()` or `.result()` on the returned set.
    pub fn get(&mut self, table: &str, filter: Option<&ColumnMap>) -> Result<ResultSet> {
        self.ensure_initialized()?.get(table, filter)
    }

    /// Run a parameterless statement. See [`Driver::execute`].
    pub fn execute(&mut self, sql: &str) -> Result<u64> {
        self.ensure_initialized()?.execute(sql)
    }

    /// Key generated by the last successful insert. See [`Driver::last_insert_id`].
    pub fn last_insert_id(&self) -> Option<i64> {
        self.driver.as_ref().and_then(|d| d.last_insert_id())
    }

    /// A handle bound to one table.
    pub fn table(&mut self, name: impl Into<String>) -> Table<'_> {
        Table {
            db: self,
            name: name.into(),
        }
    }

    /// Close the held driver, if any.
    pub fn close(self) -> Result<()> {
        match self.driver {
            Some(driver) => driver.close(),
            None => Ok(()),
        }
    }
}

/// CRUD verbs scoped to one table of a [`Db`].
///
/// Domain repositories hold one of these (or a `&mut Db`) instead of
/// inheriting from a common base.
#[derive(Debug)]
pub struct Table<'db> {
    db: &'db mut Db,
    name: String,
}

impl Table<'_> {
    /// The table this handle targets.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert one row. See [`Db::insert`].
    pub fn insert(&mut self, data: &ColumnMap) -> Result<bool> {
        self.db.insert(&self.name, data)
    }

    /// Update the rows matching `filter`. See [`Db::update`].
    pub fn update(&mut self, data: &ColumnMap, filter: &ColumnMap) -> Result<bool> {
        self.db.update(&self.name, data, filter)
    }

    /// Delete the rows matching `filter`. See [`Db::delete`].
    pub fn delete(&mut self, filter: &ColumnMap) -> Result<bool> {
        self.db.delete(&self.name, filter)
    }

    /// Select rows, all of them when `filter` is `None` or empty. See [`Db::get`].
    pub fn get(&mut self, filter: Option<&ColumnMap>) -> Result<ResultSet> {
        self.db.get(&self.name, filter)
    }
}
