use crate::error::EntityError;
use crate::results::ResultSet;
use crate::statement::{
    Assignments, Filter, Record, build_delete, build_insert, build_select, build_update,
};

use super::Model;

/// Fluent SELECT against a [`Model`].
pub struct SelectQuery<'m> {
    model: &'m mut Model,
    columns: Vec<String>,
    filter: Filter,
    limit: Option<u64>,
    offset: Option<u64>,
    table: Option<String>,
}

impl<'m> SelectQuery<'m> {
    pub(super) fn new(model: &'m mut Model, columns: Vec<String>) -> Self {
        Self {
            model,
            columns,
            filter: Filter::None,
            limit: None,
            offset: None,
            table: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Written as the second `LIMIT` operand (`LIMIT <limit>, <offset>`). SQLite reads that
    /// form as "skip `<limit>` rows, return `<offset>` rows". Ignored unless a limit is also set.
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Query `table` instead of the model's default table.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// The statement text this query would run.
    ///
    /// # Errors
    /// Returns `EntityError::MalformedInput` for an empty column list, or a quoting error.
    pub fn statement(&self) -> Result<String, EntityError> {
        let table = self.table.as_deref().unwrap_or(self.model.table());
        build_select(
            self.model.connection(),
            table,
            &self.columns,
            Some(&self.filter),
            self.limit,
            self.offset,
        )
    }

    /// Run the query and return every matching row.
    ///
    /// # Errors
    /// Propagates statement building, driver and connection errors.
    pub fn fetch(self) -> Result<ResultSet, EntityError> {
        let sql = self.statement()?;
        self.model.smart_query(&sql)?.into_rows()
    }
}

/// Fluent INSERT against a [`Model`].
pub struct InsertQuery<'m> {
    model: &'m mut Model,
    data: Record,
    table: Option<String>,
}

impl<'m> InsertQuery<'m> {
    pub(super) fn new(model: &'m mut Model, data: Record) -> Self {
        Self {
            model,
            data,
            table: None,
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// The statement text this insert would run.
    ///
    /// # Errors
    /// Returns `EntityError::MalformedInput` for an empty record, or a rendering error.
    pub fn statement(&self) -> Result<String, EntityError> {
        let table = self.table.as_deref().unwrap_or(self.model.table());
        build_insert(self.model.connection(), table, &self.data)
    }

    /// Run the insert and return the new row id.
    ///
    /// # Errors
    /// Propagates statement building, driver and connection errors.
    pub fn run(self) -> Result<i64, EntityError> {
        let sql = self.statement()?;
        self.model.smart_query(&sql)?.into_last_insert_id()
    }
}

/// Fluent UPDATE against a [`Model`].
pub struct UpdateQuery<'m> {
    model: &'m mut Model,
    data: Assignments,
    filter: Filter,
    table: Option<String>,
}

impl<'m> UpdateQuery<'m> {
    pub(super) fn new(model: &'m mut Model, data: Assignments) -> Self {
        Self {
            model,
            data,
            filter: Filter::None,
            table: None,
        }
    }

    #[must_use]
    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = filter.into();
        self
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// The statement text this update would run.
    ///
    /// # Errors
    /// Returns `EntityError::MalformedInput` for empty assignments, or a rendering error.
    pub fn statement(&self) -> Result<String, EntityError> {
        let table = self.table.as_deref().unwrap_or(self.model.table());
        build_update(self.model.connection(), table, &self.data, Some(&self.filter))
    }

    /// Run the update and return the number of rows changed.
    ///
    /// # Errors
    /// Propagates statement building, driver and connection errors.
    pub fn run(self) -> Result<usize, EntityError> {
        let sql = self.statement()?;
        self.model.smart_query(&sql)?.into_rows_affected()
    }
}

/// Fluent DELETE against a [`Model`].
pub struct DeleteQuery<'m> {
    model: &'m mut Model,
    filter: Filter,
    table: Option<String>,
}

impl<'m> DeleteQuery<'m> {
    pub(super) fn new(model: &'m mut Model, filter: Filter) -> Self {
        Self {
            model,
            filter,
            table: None,
        }
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// The statement text this delete would run.
    ///
    /// # Errors
    /// Returns a quoting error from the filter.
    pub fn statement(&self) -> Result<String, EntityError> {
        let table = self.table.as_deref().unwrap_or(self.model.table());
        build_delete(self.model.connection(), table, &self.filter)
    }

    /// Run the delete and return the number of rows removed.
    ///
    /// # Errors
    /// Propagates statement building, driver and connection errors.
    pub fn run(self) -> Result<usize, EntityError> {
        let sql = self.statement()?;
        self.model.smart_query(&sql)?.into_rows_affected()
    }
}
