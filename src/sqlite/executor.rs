use rusqlite::Connection;

use crate::error::EntityError;
use crate::results::ResultSet;
use crate::types::{ParamConverter, RowValues};

use super::params::Params;
use super::query::build_result_set;

/// Execute a batch of SQL statements using auto-commit.
///
/// # Errors
///
/// Returns `EntityError::SqliteError` if any statement fails.
pub fn execute_batch(conn: &Connection, query: &str) -> Result<(), EntityError> {
    conn.execute_batch(query)?;
    Ok(())
}

/// Run a statement and materialize every row it returns.
///
/// # Errors
///
/// Returns `EntityError::SqliteError` if preparing, stepping or reading fails.
pub fn execute_select(
    conn: &Connection,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, EntityError> {
    let converted = Params::convert_sql_params(params)?;
    let mut stmt = conn.prepare(query)?;
    build_result_set(&mut stmt, &converted.0)
}

/// Execute a DML statement (INSERT, UPDATE, DELETE) and return the rows changed by it.
///
/// A statement with a `RETURNING` clause is stepped to completion and its returned rows are
/// counted, one per changed row.
///
/// # Errors
///
/// Returns `EntityError::SqliteError` if execution fails.
pub fn execute_dml(conn: &Connection, query: &str, params: &[RowValues]) -> Result<usize, EntityError> {
    let converted = Params::convert_sql_params(params)?;
    let refs = converted.as_refs();
    let mut stmt = conn.prepare(query)?;
    if stmt.column_count() == 0 {
        return Ok(stmt.execute(&refs[..])?);
    }

    let mut rows = stmt.query(&refs[..])?;
    let mut changed = 0;
    while rows.next()?.is_some() {
        changed += 1;
    }
    Ok(changed)
}

/// Row id of the most recent successful INSERT on this connection.
#[must_use]
pub fn last_insert_id(conn: &Connection) -> i64 {
    conn.last_insert_rowid()
}

/// Quote `text` with SQLite's own `quote()` function.
///
/// # Errors
///
/// Returns `EntityError::SqliteError` if the quoting query fails.
pub fn quote(conn: &Connection, text: &str) -> Result<String, EntityError> {
    let rs = execute_select(conn, "SELECT quote(?1)", &[RowValues::from(text)])?;
    rs.scalar()
        .and_then(RowValues::as_text)
        .map(str::to_owned)
        .ok_or_else(|| EntityError::ExecutionError("quote() returned no text".into()))
}
