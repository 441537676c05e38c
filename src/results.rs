//! Normalized query results shared by both drivers.

mod result_set;
mod row;

pub use result_set::ResultSet;
pub use row::Row;

/// Owned column names from a driver's column metadata, in statement order.
pub(crate) fn column_names<I, T>(columns: I, name_of: impl Fn(&T) -> &str) -> Vec<String>
where
    I: IntoIterator<Item = T>,
{
    columns.into_iter().map(|col| name_of(&col).to_owned()).collect()
}
