use rusqlite::types::Value;

use crate::error::EntityError;
use crate::types::{ParamConverter, RowValues};

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        // Same text form the statement builder inlines
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Bound parameters for the rusqlite driver.
pub struct Params(pub Vec<Value>);

impl Params {
    /// Borrow the values as rusqlite `ToSql` references.
    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.0.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
    }
}

impl ParamConverter for Params {
    fn convert_sql_params(params: &[RowValues]) -> Result<Self, EntityError> {
        Ok(Params(params.iter().map(row_value_to_sqlite_value).collect()))
    }
}
