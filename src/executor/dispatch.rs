use crate::connection::Connection;
use crate::error::EntityError;
use crate::types::RowValues;

use super::{QueryOutcome, StatementKind};

/// Run a statement and normalize its result by leading keyword.
///
/// - `SELECT` returns every row.
/// - `INSERT` returns the new row id.
/// - `UPDATE` / `DELETE` return the affected row count.
/// - anything else returns the plain query result un-normalized.
///
/// The id and count are read from connection state right after the statement runs, so the
/// connection must not be shared between statements in flight.
///
/// # Errors
/// Returns the driver error (also recorded on the connection), or a connection state error.
pub fn smart_query(conn: &mut Connection, sql: &str) -> Result<QueryOutcome, EntityError> {
    smart_query_with_params(conn, sql, &[])
}

/// [`smart_query`] with driver-bound parameters (`?1`, `?2`, ...) instead of inlined values.
///
/// # Errors
/// Same as [`smart_query`].
pub fn smart_query_with_params(
    conn: &mut Connection,
    sql: &str,
    params: &[RowValues],
) -> Result<QueryOutcome, EntityError> {
    let kind = StatementKind::classify(sql);
    tracing::debug!(?kind, sql, params = params.len(), "dispatching statement");

    match kind {
        StatementKind::Select => Ok(QueryOutcome::Rows(conn.query(sql, params)?)),
        StatementKind::Insert => {
            conn.execute(sql, params)?;
            Ok(QueryOutcome::LastInsertId(conn.last_insert_id()?))
        }
        StatementKind::Update | StatementKind::Delete => {
            Ok(QueryOutcome::RowsAffected(conn.execute(sql, params)?))
        }
        StatementKind::Other => Ok(QueryOutcome::Raw(conn.query(sql, params)?)),
    }
}
