use crate::error::EntityError;
use crate::escape::Quoter;

use super::{Filter, push_where};

/// Build `SELECT <columns> FROM <table>[ WHERE ...][ LIMIT n[, m]]`.
///
/// Columns may be any expression (`count(*)`, `max(id)`), joined with `, `. An offset is only
/// written after a limit; an offset on its own produces no clause. Note that SQLite reads
/// `LIMIT a, b` as `LIMIT b OFFSET a`.
///
/// # Errors
/// Returns `EntityError::MalformedInput` if `columns` is empty, and propagates quoting errors
/// from the filter.
pub fn build_select<Q: Quoter + ?Sized, S: AsRef<str>>(
    q: &Q,
    table: &str,
    columns: &[S],
    filter: Option<&Filter>,
    limit: Option<u64>,
    offset: Option<u64>,
) -> Result<String, EntityError> {
    if columns.is_empty() {
        return Err(EntityError::MalformedInput(
            "select requires at least one column".into(),
        ));
    }

    let column_list = columns
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {column_list} FROM {table}");
    push_where(&mut sql, q, filter)?;

    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {limit}"));
        if let Some(offset) = offset {
            sql.push_str(&format!(", {offset}"));
        }
    } else if offset.is_some() {
        tracing::debug!(table, "offset without limit ignored");
    }

    Ok(sql)
}
