use crate::error::EntityError;
use crate::escape::{Quoter, render_value_or_null};

use super::{Assignments, Filter, Record, push_where};

/// Build `INSERT INTO <table> (a, b) VALUES (x, y)` with columns and values in record order.
///
/// # Errors
/// Returns `EntityError::MalformedInput` for an empty record, and propagates value rendering
/// errors.
pub fn build_insert<Q: Quoter + ?Sized>(
    q: &Q,
    table: &str,
    data: &Record,
) -> Result<String, EntityError> {
    if data.is_empty() {
        return Err(EntityError::MalformedInput(
            "insert requires at least one column".into(),
        ));
    }

    let mut columns = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (column, value) in data.iter() {
        columns.push(column);
        values.push(render_value_or_null(q, value)?);
    }

    Ok(format!(
        "INSERT INTO {table} ({}) VALUES ({})",
        columns.join(", "),
        values.join(", ")
    ))
}

/// Build `UPDATE <table> SET ...[ WHERE ...]`.
///
/// Without a filter every row is updated; guarding against that is up to the caller.
///
/// # Errors
/// Returns `EntityError::MalformedInput` for empty assignments, and propagates value rendering
/// errors.
pub fn build_update<Q: Quoter + ?Sized>(
    q: &Q,
    table: &str,
    data: &Assignments,
    filter: Option<&Filter>,
) -> Result<String, EntityError> {
    if data.is_empty() {
        return Err(EntityError::MalformedInput(
            "update requires at least one assignment".into(),
        ));
    }

    let sets = match data {
        Assignments::Raw(body) => body.clone(),
        Assignments::Columns(record) => record
            .iter()
            .map(|(column, value)| Ok(format!("{column} = {}", render_value_or_null(q, value)?)))
            .collect::<Result<Vec<_>, EntityError>>()?
            .join(", "),
    };

    let mut sql = format!("UPDATE {table} SET {sets}");
    push_where(&mut sql, q, filter)?;
    Ok(sql)
}

/// Build `DELETE FROM <table>[ WHERE ...]`.
///
/// An empty filter deletes every row; guarding against that is up to the caller.
///
/// # Errors
/// Propagates quoting errors from the filter.
pub fn build_delete<Q: Quoter + ?Sized>(
    q: &Q,
    table: &str,
    filter: &Filter,
) -> Result<String, EntityError> {
    let mut sql = format!("DELETE FROM {table}");
    push_where(&mut sql, q, Some(filter))?;
    Ok(sql)
}
