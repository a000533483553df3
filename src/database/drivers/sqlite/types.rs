//! SQLite type conversion utilities.
//!
//! This module handles conversion between SQLite values (from SQLx)
//! and the generic `Value` type, plus binding `Value`s as statement parameters.
//!
//! SQLite is dynamically typed: a column's declared type is only an affinity,
//! and each stored value carries its own storage class:
//! - INTEGER: 64-bit signed integer
//! - REAL: 64-bit floating point
//! - TEXT: UTF-8 string
//! - BLOB: Binary data
//! - NULL: Null value
//!
//! Decoding therefore goes by the storage class of each value, not by the
//! declared column type.

use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Column, Row, Sqlite, TypeInfo, ValueRef};

use crate::database::traits::{Cell, Row as TraitRow, Value};

pub(crate) type SqliteQuery<'q> = Query<'q, Sqlite, SqliteArguments<'q>>;

/// Converter between SQLite values and the unified `Value` type.
pub struct SqliteValueConverter;

impl SqliteValueConverter {
    /// Convert a SQLite row to a trait Row.
    pub fn convert_row(sqlite_row: &SqliteRow) -> TraitRow {
        let cells = sqlite_row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| Cell::new(col.name(), Self::extract_value(sqlite_row, idx)))
            .collect();

        TraitRow::new(cells)
    }

    /// Bind one parameter, keeping its integer / real / text / blob / NULL kind.
    pub(crate) fn bind_value<'q>(query: SqliteQuery<'q>, value: &'q Value) -> SqliteQuery<'q> {
        match value {
            Value::Null => query.bind(None::<String>),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(s) => query.bind(s.as_str()),
            Value::Bytes(b) => query.bind(b.as_slice()),
        }
    }

    /// Bind every parameter in placeholder order.
    pub(crate) fn bind_all<'q>(query: SqliteQuery<'q>, params: &'q [Value]) -> SqliteQuery<'q> {
        params.iter().fold(query, Self::bind_value)
    }

    /// Extract a value from a SQLite row at the given column index.
    fn extract_value(row: &SqliteRow, index: usize) -> Value {
        let storage_class = match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Ok(raw) => raw.type_info().name().to_uppercase(),
            Err(_) => return Value::Null,
        };

        Self::decode_by_storage_class(row, index, &storage_class)
    }

    /// Decode a value based on the storage class SQLite reports for it.
    fn decode_by_storage_class(row: &SqliteRow, index: usize, storage_class: &str) -> Value {
        match storage_class {
            "INTEGER" => row
                .try_get::<i64, _>(index)
                .map(Value::Int)
                .unwrap_or(Value::Null),

            "REAL" => row
                .try_get::<f64, _>(index)
                .map(Value::Float)
                .unwrap_or(Value::Null),

            "TEXT" => row
                .try_get::<String, _>(index)
                .map(Value::Text)
                .unwrap_or(Value::Null),

            "BLOB" => row
                .try_get::<Vec<u8>, _>(index)
                .map(Value::Bytes)
                .unwrap_or(Value::Null),

            _ => Self::decode_unknown(row, index),
        }
    }

    /// Decode an unexpected storage class by trying common paths.
    fn decode_unknown(row: &SqliteRow, index: usize) -> Value {
        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Value::Int(v);
        }

        if let Ok(v) = row.try_get::<f64, _>(index) {
            return Value::Float(v);
        }

        if let Ok(v) = row.try_get::<String, _>(index) {
            return Value::Text(v);
        }

        if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
            return Value::Bytes(v);
        }

        tracing::warn!(index, "sqlite: undecodable column value, returning NULL");
        Value::Null
    }
}
