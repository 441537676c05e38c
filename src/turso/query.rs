use std::sync::Arc;

use crate::error::EntityError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Map one turso storage value onto `RowValues`.
#[must_use]
pub fn turso_value_to_row_value(value: turso::Value) -> RowValues {
    match value {
        turso::Value::Null => RowValues::Null,
        turso::Value::Integer(i) => RowValues::Int(i),
        turso::Value::Real(f) => RowValues::Float(f),
        turso::Value::Text(s) => RowValues::Text(s),
        turso::Value::Blob(b) => RowValues::Blob(b),
    }
}

/// Drain a turso row cursor into a result set labelled with `column_names`.
///
/// # Errors
/// Returns `EntityError::ExecutionError` if advancing the cursor or reading a column fails.
pub async fn build_result_set(
    mut rows: turso::Rows,
    column_names: Arc<Vec<String>>,
) -> Result<ResultSet, EntityError> {
    let mut result_set = ResultSet::with_capacity(16);
    result_set.set_column_names(column_names);

    loop {
        let next = rows
            .next()
            .await
            .map_err(|e| EntityError::ExecutionError(format!("Turso row fetch error: {e}")))?;
        let Some(row) = next else { break };

        let values = (0..row.column_count())
            .map(|idx| {
                row.get_value(idx)
                    .map(turso_value_to_row_value)
                    .map_err(|e| EntityError::ExecutionError(format!("Turso column {idx}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        result_set.add_row_values(values);
    }

    Ok(result_set)
}
