//! SQL statement text from structured CRUD input.
//!
//! Builders are pure: they read only their arguments and the [`Quoter`] used for text values.
//! Table and column names are inserted verbatim; only values are escaped.

mod dml;
mod select;

pub use dml::{build_delete, build_insert, build_update};
pub use select::build_select;

use crate::error::EntityError;
use crate::escape::{Quoter, render_value};
use crate::types::RowValues;

/// An ordered column -> value mapping, used for inserted rows and update assignments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(Vec<(String, RowValues)>);

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column, keeping insertion order.
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        self.0.push((column.into(), value.into()));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrow the value stored for `column`, if present.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&RowValues> {
        self.0.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }
}

impl<K: Into<String>, V: Into<RowValues>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<RowValues>, const N: usize> From<[(K, V); N]> for Record {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<RowValues>> From<Vec<(K, V)>> for Record {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

/// The WHERE body of a statement.
///
/// Column entries are joined with `AND` in insertion order. An entry whose value is the empty
/// string renders as the bare column name, with no comparison, which lets callers write
/// expressions such as `flag` or `EXISTS (...)` as keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    /// No WHERE clause.
    #[default]
    None,
    /// A pre-formed condition, used verbatim.
    Raw(String),
    /// Column = value pairs joined with AND.
    Columns(Record),
}

impl Filter {
    /// A verbatim condition.
    #[must_use]
    pub fn raw(condition: impl Into<String>) -> Self {
        Filter::Raw(condition.into())
    }

    /// Single `column = value` condition.
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Filter::Columns(Record::new().set(column, value))
    }

    /// Add another `column = value` entry. A non-empty raw condition is kept as a bare
    /// column-only entry ahead of the new one.
    #[must_use]
    pub fn and(self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        match self {
            Filter::Columns(record) => Filter::Columns(record.set(column, value)),
            Filter::Raw(cond) if !cond.trim().is_empty() => {
                Filter::Columns(Record::new().set(cond, "").set(column, value))
            }
            _ => Filter::eq(column, value),
        }
    }

    /// True when rendering would produce no WHERE clause.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::None => true,
            Filter::Raw(cond) => cond.trim().is_empty(),
            Filter::Columns(record) => record.is_empty(),
        }
    }
}

impl From<&str> for Filter {
    fn from(condition: &str) -> Self {
        Filter::Raw(condition.to_owned())
    }
}

impl From<String> for Filter {
    fn from(condition: String) -> Self {
        Filter::Raw(condition)
    }
}

impl From<Record> for Filter {
    fn from(record: Record) -> Self {
        Filter::Columns(record)
    }
}

impl<K: Into<String>, V: Into<RowValues>, const N: usize> From<[(K, V); N]> for Filter {
    fn from(pairs: [(K, V); N]) -> Self {
        Filter::Columns(pairs.into())
    }
}

impl<F: Into<Filter>> From<Option<F>> for Filter {
    fn from(filter: Option<F>) -> Self {
        filter.map_or(Filter::None, Into::into)
    }
}

/// Update data: either a raw `SET` body or column assignments.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignments {
    Raw(String),
    Columns(Record),
}

impl Assignments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Assignments::Raw(body) => body.trim().is_empty(),
            Assignments::Columns(record) => record.is_empty(),
        }
    }
}

impl From<&str> for Assignments {
    fn from(body: &str) -> Self {
        Assignments::Raw(body.to_owned())
    }
}

impl From<String> for Assignments {
    fn from(body: String) -> Self {
        Assignments::Raw(body)
    }
}

impl From<Record> for Assignments {
    fn from(record: Record) -> Self {
        Assignments::Columns(record)
    }
}

impl<K: Into<String>, V: Into<RowValues>, const N: usize> From<[(K, V); N]> for Assignments {
    fn from(pairs: [(K, V); N]) -> Self {
        Assignments::Columns(pairs.into())
    }
}

/// Render a filter as a WHERE body. Returns `None` when the filter is empty.
///
/// Text values are quoted; numbers, booleans and blobs are written as literals. `NULL` renders
/// as `column IS NULL`.
///
/// # Errors
/// Propagates quoting and literal rendering failures.
pub fn render_filter<Q: Quoter + ?Sized>(
    q: &Q,
    filter: &Filter,
) -> Result<Option<String>, EntityError> {
    if filter.is_empty() {
        return Ok(None);
    }
    match filter {
        Filter::None => Ok(None),
        Filter::Raw(cond) => Ok(Some(cond.clone())),
        Filter::Columns(record) => {
            let mut out = String::new();
            for (i, (column, value)) in record.iter().enumerate() {
                if i > 0 {
                    out.push_str(" AND ");
                }
                out.push_str(column);
                if value.is_empty_text() {
                    continue;
                }
                if value.is_null() {
                    out.push_str(" IS NULL");
                } else {
                    out.push_str(" = ");
                    out.push_str(&render_value(q, value)?);
                }
            }
            Ok(Some(out))
        }
    }
}

/// Append ` WHERE <body>` when the filter renders to something.
pub(crate) fn push_where<Q: Quoter + ?Sized>(
    sql: &mut String,
    q: &Q,
    filter: Option<&Filter>,
) -> Result<(), EntityError> {
    if let Some(filter) = filter {
        if let Some(body) = render_filter(q, filter)? {
            sql.push_str(" WHERE ");
            sql.push_str(&body);
        }
    }
    Ok(())
}
