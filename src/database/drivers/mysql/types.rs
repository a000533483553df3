//! MySQL type conversion utilities.
//!
//! This module handles conversion between MySQL-specific types (from SQLx)
//! and the generic `Value` type, plus binding `Value`s as statement parameters.
//! Types without a lossless numeric mapping (DECIMAL, temporal, JSON) are
//! returned as text in MySQL's own formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlArguments, MySqlColumn, MySqlRow, MySqlSslMode};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row, TypeInfo, ValueRef};

use crate::database::traits::{Cell, Row as TraitRow, SslMode, Value};

pub(crate) type MySqlQuery<'q> = Query<'q, MySql, MySqlArguments>;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Converter between MySQL values and the unified `Value` type.
pub struct MySqlValueConverter;

impl MySqlValueConverter {
    /// Convert a MySQL row to a trait Row.
    pub fn convert_row(mysql_row: &MySqlRow) -> TraitRow {
        let cells = mysql_row
            .columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| Cell::new(col.name(), Self::extract_value(mysql_row, col, idx)))
            .collect();

        TraitRow::new(cells)
    }

    /// Bind one parameter with its integer / double / string / blob / NULL wire type.
    pub(crate) fn bind_value<'q>(query: MySqlQuery<'q>, value: &'q Value) -> MySqlQuery<'q> {
        match value {
            Value::Null => query.bind(None::<String>),
            Value::Int(v) => query.bind(*v),
            Value::Float(v) => query.bind(*v),
            Value::Text(s) => query.bind(s.as_str()),
            Value::Bytes(b) => query.bind(b.as_slice()),
        }
    }

    /// Bind every parameter in placeholder order.
    pub(crate) fn bind_all<'q>(query: MySqlQuery<'q>, params: &'q [Value]) -> MySqlQuery<'q> {
        params.iter().fold(query, Self::bind_value)
    }

    /// Extract a value from a MySQL row at the given column index.
    fn extract_value(row: &MySqlRow, column: &MySqlColumn, index: usize) -> Value {
        match row.try_get_raw(index) {
            Ok(raw) if raw.is_null() => return Value::Null,
            Err(_) => return Value::Null,
            _ => {}
        }

        let type_name = column.type_info().name();
        Self::decode_by_type(row, index, type_name)
    }

    /// Decode a value based on its MySQL type name.
    fn decode_by_type(row: &MySqlRow, index: usize, type_name: &str) -> Value {
        match type_name {
            // Boolean (MySQL uses TINYINT(1) for booleans)
            "BOOLEAN" | "BOOL" => row
                .try_get::<bool, _>(index)
                .map(Value::from)
                .unwrap_or(Value::Null),

            // Integers
            "TINYINT" => row
                .try_get::<i8, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "TINYINT UNSIGNED" => row
                .try_get::<u8, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "SMALLINT" => row
                .try_get::<i16, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "SMALLINT UNSIGNED" => row
                .try_get::<u16, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "YEAR" => row
                .try_get::<u16, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or_else(|_| Self::decode_fallback(row, index, type_name)),

            "MEDIUMINT" | "INT" | "INTEGER" => row
                .try_get::<i32, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "MEDIUMINT UNSIGNED" | "INT UNSIGNED" | "INTEGER UNSIGNED" => row
                .try_get::<u32, _>(index)
                .map(|v| Value::Int(v as i64))
                .unwrap_or(Value::Null),

            "BIGINT" => row
                .try_get::<i64, _>(index)
                .map(Value::Int)
                .unwrap_or(Value::Null),

            // Values above i64::MAX keep their exact digits as text
            "BIGINT UNSIGNED" => row
                .try_get::<u64, _>(index)
                .map(|v| match i64::try_from(v) {
                    Ok(v) => Value::Int(v),
                    Err(_) => Value::Text(v.to_string()),
                })
                .unwrap_or(Value::Null),

            // Floating point
            "FLOAT" => row
                .try_get::<f32, _>(index)
                .map(|v| Value::Float(v as f64))
                .unwrap_or(Value::Null),

            "DOUBLE" | "DOUBLE PRECISION" | "REAL" => row
                .try_get::<f64, _>(index)
                .map(Value::Float)
                .unwrap_or(Value::Null),

            // Numeric/Decimal: text keeps the exact scale
            "DECIMAL" | "NUMERIC" | "DEC" | "FIXED" => row
                .try_get::<Decimal, _>(index)
                .map(|d| Value::Text(d.to_string()))
                .unwrap_or(Value::Null),

            // Text types
            "CHAR" | "VARCHAR" | "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" | "ENUM"
            | "SET" => row
                .try_get::<String, _>(index)
                .map(Value::Text)
                .unwrap_or(Value::Null),

            // Binary types
            "BINARY" | "VARBINARY" | "TINYBLOB" | "BLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BIT" => {
                row.try_get::<Vec<u8>, _>(index)
                    .map(Value::Bytes)
                    .unwrap_or(Value::Null)
            }

            // Date/Time types
            "DATE" => row
                .try_get::<NaiveDate, _>(index)
                .map(|d| Value::Text(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null),

            "TIME" => row
                .try_get::<NaiveTime, _>(index)
                .map(|t| Value::Text(t.format("%H:%M:%S%.f").to_string()))
                .unwrap_or(Value::Null),

            "DATETIME" => row
                .try_get::<NaiveDateTime, _>(index)
                .map(|dt| Value::Text(dt.format(DATETIME_FORMAT).to_string()))
                .unwrap_or(Value::Null),

            "TIMESTAMP" => row
                .try_get::<DateTime<Utc>, _>(index)
                .map(|dt| Value::Text(dt.format(DATETIME_FORMAT).to_string()))
                .or_else(|_| {
                    row.try_get::<NaiveDateTime, _>(index)
                        .map(|dt| Value::Text(dt.format(DATETIME_FORMAT).to_string()))
                })
                .unwrap_or(Value::Null),

            // JSON type, re-serialized compactly
            "JSON" => row
                .try_get::<serde_json::Value, _>(index)
                .map(|j| Value::Text(j.to_string()))
                .unwrap_or(Value::Null),

            // For unknown types, try common decode paths
            _ => Self::decode_fallback(row, index, type_name),
        }
    }

    /// Fallback for types not listed above.
    fn decode_fallback(row: &MySqlRow, index: usize, type_name: &str) -> Value {
        if let Ok(s) = row.try_get::<String, _>(index) {
            return Value::Text(s);
        }

        if let Ok(v) = row.try_get::<i64, _>(index) {
            return Value::Int(v);
        }

        if let Ok(v) = row.try_get::<f64, _>(index) {
            return Value::Float(v);
        }

        if let Ok(v) = row.try_get::<Vec<u8>, _>(index) {
            return Value::Bytes(v);
        }

        tracing::warn!(index, type_name, "mysql: undecodable column type, returning NULL");
        Value::Null
    }

    /// Map the generic SSL mode to MySQL's.
    pub fn map_ssl_mode(mode: SslMode) -> MySqlSslMode {
        match mode {
            SslMode::Disable => MySqlSslMode::Disabled,
            SslMode::Prefer => MySqlSslMode::Preferred,
            SslMode::Require => MySqlSslMode::Required,
            SslMode::VerifyCa => MySqlSslMode::VerifyCa,
            SslMode::VerifyFull => MySqlSslMode::VerifyIdentity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ssl_mode_mapping() {
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(SslMode::Disable),
            MySqlSslMode::Disabled
        ));
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(SslMode::Prefer),
            MySqlSslMode::Preferred
        ));
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(SslMode::Require),
            MySqlSslMode::Required
        ));
        assert!(matches!(
            MySqlValueConverter::map_ssl_mode(SslMode::VerifyFull),
            MySqlSslMode::VerifyIdentity
        ));
    }
}
