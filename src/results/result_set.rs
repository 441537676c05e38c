use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::row::{Row, build_column_index};
use crate::types::RowValues;

/// A result set from a database query
///
/// Rows come back in the order the driver produced them; an empty set is a valid result, not
/// an error.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<Row>,
    /// Column names shared by all rows (to avoid duplicating in each row)
    column_names: Option<Arc<Vec<String>>>,
    column_index: Option<Arc<HashMap<String, usize>>>,
}

impl ResultSet {
    /// Create a new result set with a known capacity
    #[must_use]
    pub fn with_capacity(capacity: usize) -> ResultSet {
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: None,
            column_index: None,
        }
    }

    /// Set the column names for this result set (to be shared by all rows)
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        self.column_index = Some(Arc::new(build_column_index(&column_names)));
        self.column_names = Some(column_names);
    }

    /// Add a row to the result set.
    ///
    /// Rows added before column names are known get positional names (`0`, `1`, ...).
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        if self.column_names.is_none() {
            let positional = (0..row_values.len()).map(|i| i.to_string()).collect();
            self.set_column_names(Arc::new(positional));
        }
        let (Some(column_names), Some(column_index)) = (&self.column_names, &self.column_index)
        else {
            return;
        };

        self.results.push(Row {
            column_names: Arc::clone(column_names),
            values: row_values,
            column_index: Arc::clone(column_index),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// First row, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Row> {
        self.results.first()
    }

    /// The first column of the first row, for single-value queries such as `count(*)`.
    #[must_use]
    pub fn scalar(&self) -> Option<&RowValues> {
        self.first().and_then(|row| row.get_by_index(0))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.results.iter()
    }

    /// Render every row as a JSON object inside a JSON array.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.results.iter().map(Row::to_json).collect())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_share_column_lookup() {
        let mut rs = ResultSet::with_capacity(2);
        rs.set_column_names(Arc::new(vec!["id".into(), "name".into()]));
        rs.add_row_values(vec![RowValues::Int(1), RowValues::Text("bolt".into())]);
        rs.add_row_values(vec![RowValues::Int(2), RowValues::Text("nut".into())]);

        assert_eq!(rs.len(), 2);
        assert_eq!(rs.results[1].get("name"), Some(&RowValues::Text("nut".into())));
        assert_eq!(rs.scalar(), Some(&RowValues::Int(1)));
        assert_eq!(
            rs.to_json(),
            serde_json::json!([{"id": 1, "name": "bolt"}, {"id": 2, "name": "nut"}])
        );
    }

    #[test]
    fn empty_set_has_no_scalar() {
        let rs = ResultSet::default();
        assert!(rs.is_empty());
        assert!(rs.scalar().is_none());
    }
}
