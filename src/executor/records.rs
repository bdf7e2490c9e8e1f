//! Row decoding
//!
//! Rows are decoded column by column from the static table description into
//! JSON objects. Every column was selected through `Table::select_list`, so
//! its runtime type always matches the declared storage type.

use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::catalog::{Column, StorageType, Table};

use super::errors::{ExecutorError, ExecutorResult};

/// A decoded catalog record
pub type Record = Map<String, Value>;

/// Decode one column by its storage type; SQL NULL becomes JSON null
pub fn decode_column(row: &SqliteRow, column: &Column) -> ExecutorResult<Value> {
    decode_named(row, column.name, column.storage)
}

pub(crate) fn decode_named(
    row: &SqliteRow,
    name: &str,
    storage: StorageType,
) -> ExecutorResult<Value> {
    let err = |e: sqlx::Error| ExecutorError::decode(name, e);
    let value = match storage {
        StorageType::Integer => row
            .try_get::<Option<i64>, _>(name)
            .map_err(err)?
            .map(Value::from),
        StorageType::Real => row
            .try_get::<Option<f64>, _>(name)
            .map_err(err)?
            .and_then(Number::from_f64)
            .map(Value::Number),
        StorageType::Text => row
            .try_get::<Option<String>, _>(name)
            .map_err(err)?
            .map(Value::String),
        StorageType::Boolean => row
            .try_get::<Option<i64>, _>(name)
            .map_err(err)?
            .map(|v| Value::Bool(v != 0)),
    };
    Ok(value.unwrap_or(Value::Null))
}

/// Decode every column of `table` from a row selected with its select list
pub fn decode_record(table: &Table, row: &SqliteRow) -> ExecutorResult<Record> {
    let mut record = Map::with_capacity(table.columns.len());
    for column in table.iter() {
        record.insert(column.name.to_string(), decode_column(row, column)?);
    }
    Ok(record)
}

/// Integer key column that must be present
pub(crate) fn decode_key(row: &SqliteRow, name: &str) -> ExecutorResult<i64> {
    row.try_get::<Option<i64>, _>(name)
        .map_err(|e| ExecutorError::decode(name, e))?
        .ok_or_else(|| ExecutorError::decode(name, "unexpected NULL key"))
}

/// `id` of a decoded record
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}

/// Render a JSON scalar as a plain CSV/label string; null becomes empty
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
