use crate::error::EntityError;
use crate::types::{ParamConverter, RowValues};

/// Container for turso parameters (positional only).
pub struct Params(pub turso::params::Params);

fn row_value_to_turso_value(value: &RowValues) -> turso::Value {
    match value {
        RowValues::Int(i) => turso::Value::Integer(*i),
        RowValues::Float(f) => turso::Value::Real(*f),
        RowValues::Text(s) => turso::Value::Text(s.clone()),
        RowValues::Bool(b) => turso::Value::Integer(i64::from(*b)),
        // No datetime storage class; TEXT keeps parity with the rusqlite driver
        RowValues::Timestamp(dt) => turso::Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => turso::Value::Null,
        RowValues::JSON(j) => turso::Value::Text(j.to_string()),
        RowValues::Blob(bytes) => turso::Value::Blob(bytes.clone()),
    }
}

impl ParamConverter for Params {
    fn convert_sql_params(params: &[RowValues]) -> Result<Self, EntityError> {
        let values: Vec<turso::Value> = params.iter().map(row_value_to_turso_value).collect();
        Ok(Params(turso::params::Params::Positional(values)))
    }
}
