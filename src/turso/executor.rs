use std::sync::Arc;

use crate::error::EntityError;
use crate::results::{ResultSet, column_names};
use crate::types::{ParamConverter, RowValues};

use super::TursoDriver;
use super::params::Params;
use super::query::build_result_set;

/// Execute a batch of SQL statements.
///
/// # Errors
///
/// Returns `EntityError::ExecutionError` when the underlying turso batch execution fails.
pub fn execute_batch(driver: &TursoDriver, query: &str) -> Result<(), EntityError> {
    driver.block_on(|conn| async move {
        conn.execute_batch(query)
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso execute_batch error: {e}")))
    })
}

/// Run a statement and materialize every row it returns.
///
/// # Errors
///
/// Returns `EntityError::ExecutionError` when preparing or running the query fails, or when
/// converting rows fails.
pub fn execute_select(
    driver: &TursoDriver,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, EntityError> {
    let converted = Params::convert_sql_params(params)?;
    driver.block_on(|conn| async move {
        let mut stmt = conn
            .prepare(query)
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso prepare error: {e}")))?;

        let names = Arc::new(column_names(stmt.columns().iter(), |col| col.name()));

        let rows = stmt
            .query(converted.0)
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso query error: {e}")))?;

        build_result_set(rows, names).await
    })
}

/// Execute a DML statement and return the affected row count.
///
/// A statement with a `RETURNING` clause is drained and its returned rows are counted, one per
/// changed row.
///
/// # Errors
///
/// Returns `EntityError::ExecutionError` when executing the statement fails or the affected
/// row count cannot be converted to `usize`.
pub fn execute_dml(
    driver: &TursoDriver,
    query: &str,
    params: &[RowValues],
) -> Result<usize, EntityError> {
    let converted = Params::convert_sql_params(params)?;
    driver.block_on(|conn| async move {
        let mut stmt = conn
            .prepare(query)
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso prepare error: {e}")))?;

        if stmt.columns().is_empty() {
            let affected = stmt
                .execute(converted.0)
                .await
                .map_err(|e| EntityError::ExecutionError(format!("Turso execute error: {e}")))?;
            return usize::try_from(affected).map_err(|e| {
                EntityError::ExecutionError(format!("Turso affected rows conversion error: {e}"))
            });
        }

        let mut rows = stmt
            .query(converted.0)
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso query error: {e}")))?;
        let mut changed = 0;
        while rows
            .next()
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso row fetch error: {e}")))?
            .is_some()
        {
            changed += 1;
        }
        Ok(changed)
    })
}

/// Row id of the most recent successful INSERT on this connection.
///
/// # Errors
///
/// Returns `EntityError::ExecutionError` if the lookup query fails or yields no integer.
pub fn last_insert_id(driver: &TursoDriver) -> Result<i64, EntityError> {
    let rs = execute_select(driver, "SELECT last_insert_rowid()", &[])?;
    rs.scalar()
        .and_then(RowValues::as_int)
        .copied()
        .ok_or_else(|| EntityError::ExecutionError("Turso last_insert_rowid returned no value".into()))
}

/// Quote `text` with the engine's own `quote()` function.
///
/// # Errors
///
/// Returns `EntityError::ExecutionError` if the quoting query fails or yields no text.
pub fn quote(driver: &TursoDriver, text: &str) -> Result<String, EntityError> {
    let rs = execute_select(driver, "SELECT quote(?1)", &[RowValues::from(text)])?;
    rs.scalar()
        .and_then(RowValues::as_text)
        .map(str::to_owned)
        .ok_or_else(|| EntityError::ExecutionError("Turso quote() returned no text".into()))
}
