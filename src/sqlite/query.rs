use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::EntityError;
use crate::results::{ResultSet, column_names};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `EntityError` if the value cannot be read.
pub fn sqlite_extract_value_sync(row: &rusqlite::Row, idx: usize) -> Result<RowValues, EntityError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Step a prepared statement to completion, collecting every row it yields.
///
/// Statements that produce no rows (DDL, pragmas that only set) still run to completion and
/// give back an empty set.
///
/// # Errors
/// Returns `EntityError::SqliteError` if stepping the statement or reading a value fails.
pub fn build_result_set(stmt: &mut Statement, params: &[Value]) -> Result<ResultSet, EntityError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let names = Arc::new(column_names(stmt.column_names(), |name| *name));
    let col_count = names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(names);

    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
