use std::fmt;

use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::EntityError;

/// Values that can be stored in a database row, written by the statement builder, or bound as
/// parameters.
///
/// ```rust
/// use sql_entity::prelude::*;
///
/// let values: Vec<RowValues> = vec![1.into(), "alice".into(), true.into(), RowValues::Null];
/// # let _ = values;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// True for the empty string, which filter rendering treats as "column only".
    #[must_use]
    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    /// Convert into a `serde_json` value for the view layer.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => JsonValue::from(*f),
            RowValues::Text(s) => JsonValue::from(s.as_str()),
            RowValues::Bool(b) => JsonValue::from(*b),
            RowValues::Timestamp(dt) => JsonValue::from(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(j) => j.clone(),
            RowValues::Blob(bytes) => JsonValue::from(bytes.clone()),
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_owned())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The client driver a connection wraps.
///
/// Variants are listed in probing priority order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// `rusqlite` (feature `sqlite`)
    Sqlite,
    /// `turso` in-process engine (feature `turso`)
    Turso,
}

impl DriverKind {
    /// All drivers in probing order, compiled in or not.
    pub const PRIORITY: [DriverKind; 2] = [DriverKind::Sqlite, DriverKind::Turso];

    /// Whether this driver was compiled into the crate.
    #[must_use]
    pub fn is_available(self) -> bool {
        match self {
            DriverKind::Sqlite => cfg!(feature = "sqlite"),
            DriverKind::Turso => cfg!(feature = "turso"),
        }
    }

    /// First available driver in priority order, if any.
    #[must_use]
    pub fn probe() -> Option<DriverKind> {
        Self::PRIORITY.into_iter().find(|kind| kind.is_available())
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DriverKind::Sqlite => "sqlite",
            DriverKind::Turso => "turso",
        }
    }
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convert a slice of `RowValues` into a driver's bound-parameter type.
pub trait ParamConverter: Sized {
    /// Convert a slice of `RowValues` into the driver's parameter type.
    ///
    /// # Errors
    ///
    /// Returns `EntityError` if the conversion fails for any parameter.
    fn convert_sql_params(params: &[RowValues]) -> Result<Self, EntityError>;
}
