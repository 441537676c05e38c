//! Rendering values as SQL literal text.
//!
//! Text goes through a [`Quoter`], which each driver implements with its own quoting
//! primitive. Everything else has a fixed literal form. `NULL` is written by the statement
//! builder before a value ever reaches this module.

use crate::error::EntityError;
use crate::types::RowValues;

/// Something that can turn arbitrary text into a quoted SQL string literal.
pub trait Quoter {
    /// Quote `text`, returning a literal that is safe to inline into a statement.
    ///
    /// # Errors
    /// Returns `EntityError` when the quoting primitive needs a live connection and none is
    /// available.
    fn quote(&self, text: &str) -> Result<String, EntityError>;
}

/// Driver-independent quoting following SQLite's literal rules: wrap in `'` and double every
/// embedded `'`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlLiteral;

impl Quoter for SqlLiteral {
    fn quote(&self, text: &str) -> Result<String, EntityError> {
        Ok(quote_literal(text))
    }
}

impl<Q: Quoter + ?Sized> Quoter for &Q {
    fn quote(&self, text: &str) -> Result<String, EntityError> {
        (**self).quote(text)
    }
}

#[must_use]
pub fn quote_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('\'');
    for ch in text.chars() {
        if ch == '\'' {
            out.push('\'');
        }
        out.push(ch);
    }
    out.push('\'');
    out
}

/// Render a non-null value as literal SQL text.
///
/// # Errors
/// Returns `EntityError::MalformedInput` for `NULL` (callers render it themselves) and for
/// non-finite floats, which SQLite has no literal for. Quoting errors are propagated.
pub fn render_value<Q: Quoter + ?Sized>(q: &Q, value: &RowValues) -> Result<String, EntityError> {
    match value {
        RowValues::Int(i) => Ok(i.to_string()),
        RowValues::Float(f) => {
            if !f.is_finite() {
                return Err(EntityError::MalformedInput(format!(
                    "cannot render non-finite float {f} as SQL"
                )));
            }
            // Debug keeps a decimal point so SQLite reads a REAL
            Ok(format!("{f:?}"))
        }
        RowValues::Text(s) => q.quote(s),
        RowValues::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
        RowValues::Timestamp(dt) => q.quote(&dt.format("%F %T%.f").to_string()),
        RowValues::JSON(j) => q.quote(&j.to_string()),
        RowValues::Blob(bytes) => {
            let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
            Ok(format!("X'{hex}'"))
        }
        RowValues::Null => Err(EntityError::MalformedInput(
            "NULL must be rendered by the caller, not escaped".into(),
        )),
    }
}

/// Render a value, writing `NULL` for nulls.
///
/// # Errors
/// Same as [`render_value`] for non-null values.
pub fn render_value_or_null<Q: Quoter + ?Sized>(
    q: &Q,
    value: &RowValues,
) -> Result<String, EntityError> {
    if value.is_null() {
        Ok("NULL".to_string())
    } else {
        render_value(q, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn doubles_embedded_quotes() {
        assert_eq!(quote_literal("O'Brien"), "'O''Brien'");
        assert_eq!(quote_literal("''"), "''''''");
        assert_eq!(quote_literal(""), "''");
    }

    #[test]
    fn renders_scalars() -> Result<(), EntityError> {
        assert_eq!(render_value(&SqlLiteral, &RowValues::Int(-7))?, "-7");
        assert_eq!(render_value(&SqlLiteral, &RowValues::Float(2.0))?, "2.0");
        assert_eq!(render_value(&SqlLiteral, &RowValues::Bool(true))?, "1");
        assert_eq!(render_value(&SqlLiteral, &RowValues::Blob(vec![0, 255]))?, "X'00FF'");
        assert_eq!(render_value(&SqlLiteral, &RowValues::Blob(Vec::new()))?, "X''");
        assert_eq!(
            render_value(&SqlLiteral, &RowValues::Text("a'b".into()))?,
            "'a''b'"
        );
        Ok(())
    }

    #[test]
    fn renders_timestamp_as_text() -> Result<(), EntityError> {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 2)
            .and_then(|d| d.and_hms_opt(3, 4, 5))
            .expect("valid date");
        assert_eq!(
            render_value(&SqlLiteral, &RowValues::Timestamp(dt))?,
            "'2024-01-02 03:04:05'"
        );
        Ok(())
    }

    #[test]
    fn null_is_rendered_by_caller() {
        assert!(render_value(&SqlLiteral, &RowValues::Null).is_err());
        assert_eq!(
            render_value_or_null(&SqlLiteral, &RowValues::Null).ok().as_deref(),
            Some("NULL")
        );
    }

    #[test]
    fn rejects_nan() {
        assert!(matches!(
            render_value(&SqlLiteral, &RowValues::Float(f64::NAN)),
            Err(EntityError::MalformedInput(_))
        ));
    }
}
