//! Parameterized statement construction.
//!
//! Every verb is turned into SQL text plus an ordered parameter list. Values
//! never enter the SQL text: each one becomes a placeholder and is bound
//! separately by the driver. Identifiers are quoted per dialect.
//!
//! The safety rules live here so both drivers share them: an `update` needs
//! both a SET payload and a WHERE predicate, a `delete` needs a WHERE
//! predicate, and an `insert` needs at least one column. Violations are
//! rejected before any SQL is built.

use std::fmt::Write as _;

use super::error::{DbError, Result};
use super::traits::{ColumnMap, Value};

/// How parameter slots are written into the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placeholder {
    /// Anonymous `?`, bound strictly in order.
    Positional,
    /// Explicitly numbered `?1`, `?2`, ... so SET and WHERE slots of one
    /// statement can never be bound to each other's values.
    Numbered,
}

/// SQL flavour of a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    quote: char,
    placeholder: Placeholder,
}

/// A statement ready for binding.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundQuery {
    /// SQL text containing only placeholders, never values
    pub sql: String,
    /// Parameters in placeholder order
    pub params: Vec<Value>,
}

impl Dialect {
    /// MySQL / MariaDB: backtick identifiers, positional placeholders
    pub const MYSQL: Dialect = Dialect {
        quote: '`',
        placeholder: Placeholder::Positional,
    };

    /// SQLite: double-quoted identifiers, numbered placeholders
    pub const SQLITE: Dialect = Dialect {
        quote: '"',
        placeholder: Placeholder::Numbered,
    };

    /// Quote a table or column name.
    ///
    /// Embedded quote characters are doubled. Empty names and names
    /// containing NUL are rejected.
    pub fn quote_identifier(&self, name: &str) -> Result<String> {
        if name.is_empty() {
            return Err(DbError::invalid_argument("identifier must not be empty"));
        }
        if name.contains('\0') {
            return Err(DbError::invalid_argument(format!(
                "identifier {:?} contains a NUL byte",
                name
            )));
        }

        let mut quoted = String::with_capacity(name.len() + 2);
        quoted.push(self.quote);
        for ch in name.chars() {
            if ch == self.quote {
                quoted.push(ch);
            }
            quoted.push(ch);
        }
        quoted.push(self.quote);
        Ok(quoted)
    }

    /// `SELECT * FROM table [WHERE col = ? AND ...]`
    ///
    /// A missing or empty filter selects every row.
    pub fn select(&self, table: &str, filter: Option<&ColumnMap>) -> Result<BoundQuery> {
        let mut builder = Builder::new(*self);
        write!(builder.sql, "SELECT * FROM {}", self.quote_identifier(table)?).ok();

        if let Some(filter) = filter.filter(|f| !f.is_empty()) {
            builder.sql.push_str(" WHERE ");
            builder.push_assignments(filter, " AND ")?;
        }

        Ok(builder.finish())
    }

    /// `INSERT INTO table (cols) VALUES (?, ...)`
    pub fn insert(&self, table: &str, data: &ColumnMap) -> Result<BoundQuery> {
        if data.is_empty() {
            return Err(DbError::invalid_argument(
                "INSERT requires at least one column",
            ));
        }

        let mut builder = Builder::new(*self);
        let columns = data
            .columns()
            .map(|c| self.quote_identifier(c))
            .collect::<Result<Vec<_>>>()?;
        let placeholders: Vec<String> = data.values().map(|v| builder.push_param(v)).collect();

        write!(
            builder.sql,
            "INSERT INTO {} ({}) VALUES ({})",
            self.quote_identifier(table)?,
            columns.join(", "),
            placeholders.join(", ")
        )
        .ok();

        Ok(builder.finish())
    }

    /// `UPDATE table SET col = ?, ... WHERE col = ? AND ...`
    pub fn update(&self, table: &str, data: &ColumnMap, filter: &ColumnMap) -> Result<BoundQuery> {
        if data.is_empty() || filter.is_empty() {
            return Err(DbError::invalid_argument(
                "UPDATE requires both data and a non-empty WHERE clause",
            ));
        }

        let mut builder = Builder::new(*self);
        write!(builder.sql, "UPDATE {} SET ", self.quote_identifier(table)?).ok();
        builder.push_assignments(data, ", ")?;
        builder.sql.push_str(" WHERE ");
        builder.push_assignments(filter, " AND ")?;

        Ok(builder.finish())
    }

    /// `DELETE FROM table WHERE col = ? AND ...`
    pub fn delete(&self, table: &str, filter: &ColumnMap) -> Result<BoundQuery> {
        if filter.is_empty() {
            return Err(DbError::invalid_argument(
                "DELETE requires a non-empty WHERE clause",
            ));
        }

        let mut builder = Builder::new(*self);
        write!(builder.sql, "DELETE FROM {} WHERE ", self.quote_identifier(table)?).ok();
        builder.push_assignments(filter, " AND ")?;

        Ok(builder.finish())
    }
}

struct Builder {
    dialect: Dialect,
    sql: String,
    params: Vec<Value>,
}

impl Builder {
    fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Record a parameter and return the placeholder text for it.
    fn push_param(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        match self.dialect.placeholder {
            Placeholder::Positional => "?".to_string(),
            Placeholder::Numbered => format!("?{}", self.params.len()),
        }
    }

    /// Append `col = ?` pairs joined by `separator`.
    fn push_assignments(&mut self, map: &ColumnMap, separator: &str) -> Result<()> {
        for (i, (column, value)) in map.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(separator);
            }
            let column = self.dialect.quote_identifier(column)?;
            let slot = self.push_param(value);
            write!(self.sql, "{} = {}", column, slot).ok();
        }
        Ok(())
    }

    fn finish(self) -> BoundQuery {
        BoundQuery {
            sql: self.sql,
            params: self.params,
        }
    }
}
