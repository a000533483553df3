//! Walks a small product catalogue through insert, read, update and delete.
//!
//! Connection settings come from the `DB_*` environment variables; with none
//! set it runs against an in-memory SQLite database.
//!
//! ```text
//! DB_CONNECTION=sqlite3 DB_DATABASE=shop.db RUST_LOG=dbshim=debug cargo run --bin products
//! ```

use anyhow::{Context, Result};
use dbshim::{ColumnMap, DatabaseType, Db, DbConfig, Row, Table, Value};

const TABLE: &str = "products";

/// Product persistence built on a table handle.
struct ProductRepository<'db> {
    table: Table<'db>,
}

impl<'db> ProductRepository<'db> {
    fn new(db: &'db mut Db) -> Self {
        Self {
            table: db.table(TABLE),
        }
    }

    fn save(&mut self, title: &str, price: i64) -> Result<bool> {
        let product = ColumnMap::new().with("title", title).with("price", price);
        Ok(self.table.insert(&product)?)
    }

    fn read(&mut self, id: i64) -> Result<Option<Row>> {
        Ok(self.table.get(Some(&by_id(id)))?.row())
    }

    fn find_all(&mut self) -> Result<Vec<Row>> {
        Ok(self.table.get(None)?.result())
    }

    fn update(&mut self, id: i64, changes: &ColumnMap) -> Result<bool> {
        Ok(self.table.update(changes, &by_id(id))?)
    }

    fn delete(&mut self, id: i64) -> Result<bool> {
        Ok(self.table.delete(&by_id(id))?)
    }
}

fn by_id(id: i64) -> ColumnMap {
    ColumnMap::new().with("id", id)
}

fn create_table(db: &mut Db) -> Result<()> {
    let ddl = match db.instance()?.database_type() {
        DatabaseType::MySQL => {
            "CREATE TABLE IF NOT EXISTS products (\
                id INT AUTO_INCREMENT PRIMARY KEY, \
                title VARCHAR(255) NOT NULL, \
                price INT NOT NULL)"
        }
        DatabaseType::SQLite => {
            "CREATE TABLE IF NOT EXISTS products (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                title TEXT NOT NULL, \
                price INTEGER NOT NULL)"
        }
    };
    db.execute(ddl).context("creating products table")?;
    Ok(())
}

fn display(row: &Row) -> String {
    let field = |name: &str| row.get(name).map(Value::to_display_string).unwrap_or_default();
    format!(
        "ID: {}, Product: {}, Price: {}",
        field("id"),
        field("title"),
        field("price")
    )
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,dbshim=debug".into()),
        )
        .init();

    let config = DbConfig::from_env().context("reading DB_* environment")?;
    let mut db = Db::connect(&config).context("connecting to database")?;
    create_table(&mut db)?;

    {
        let mut products = ProductRepository::new(&mut db);
        for (title, price) in [("ASDF", 15), ("Lamp", 32), ("Desk", 120)] {
            products.save(title, price)?;
        }

        match products.read(1)? {
            Some(row) => println!("read: {}", serde_json::to_string(&row)?),
            None => println!("read: no product with id 1"),
        }

        let renamed = products.update(1, &ColumnMap::new().with("title", "QWERTY"))?;
        tracing::info!(renamed, "renamed product 1");

        let removed = products.delete(2)?;
        tracing::info!(removed, "deleted product 2");

        // Zero matches is a successful call, not an error
        let missing = products.delete(999)?;
        tracing::info!(missing, "deleted product 999");

        println!();
        for row in products.find_all()? {
            println!("{}", display(&row));
        }
    }

    db.close()?;
    Ok(())
}
