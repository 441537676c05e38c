//! The entity base: one table-backed entity, one connection, CRUD bound to the entity's table.

mod meta;
mod query;
pub mod registry;

pub use meta::{Entity, EntityMeta, Operation};
pub use query::{DeleteQuery, InsertQuery, SelectQuery, UpdateQuery};
pub use registry::EntityRegistry;

use crate::config::DbOptions;
use crate::connection::Connection;
use crate::error::EntityError;
use crate::executor::{QueryOutcome, smart_query, smart_query_with_params};
use crate::statement::{Assignments, Filter, Record, build_select};
use crate::types::{DriverKind, RowValues};

/// CRUD access to one entity's table over an exclusively owned connection.
///
/// Methods that run statements take `&mut self`: the last-id and affected-count reads are
/// connection state, so a model is used from one thread at a time. Wrap it in a `Mutex` to
/// share it.
///
/// The API is blocking. A turso-backed model refuses to run inside a tokio runtime and returns
/// `EntityError::AsyncContext`; move such calls onto `spawn_blocking`.
///
/// ```rust,no_run
/// use sql_entity::prelude::*;
///
/// # fn demo() -> Result<(), EntityError> {
/// let mut widgets = Model::try_new(EntityMeta::named("Widgets"), &DbOptions::new("app.db"))?;
/// let id = widgets.insert([("name", RowValues::from("bolt")), ("qty", 5.into())]).run()?;
/// widgets.update([("qty", 10)]).filter([("id", id)]).run()?;
/// let rows = widgets.select(&["qty"]).filter([("id", id)]).fetch()?;
/// # let _ = rows;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Model {
    conn: Connection,
    meta: EntityMeta,
}

impl Model {
    /// Open a model, ending up with an unconfigured connection if the database cannot be
    /// opened. The failure is logged and returned by every later call.
    #[must_use]
    pub fn new(meta: EntityMeta, opts: &DbOptions) -> Self {
        Self::with_connection(meta, Connection::open_or_unconfigured(opts))
    }

    /// Open a model, failing if the database cannot be opened.
    ///
    /// # Errors
    /// See [`Connection::open`].
    pub fn try_new(meta: EntityMeta, opts: &DbOptions) -> Result<Self, EntityError> {
        Ok(Self::with_connection(meta, Connection::open(opts)?))
    }

    /// Open a model for a concrete entity type.
    #[must_use]
    pub fn for_entity<E: Entity>(opts: &DbOptions) -> Self {
        Self::new(E::meta(), opts)
    }

    #[must_use]
    pub fn with_connection(meta: EntityMeta, conn: Connection) -> Self {
        Self { conn, meta }
    }

    #[must_use]
    pub fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }

    /// The default table for subsequent calls.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.meta.table
    }

    /// Change the default table for subsequent calls.
    pub fn from(&mut self, table: impl Into<String>) -> &mut Self {
        self.meta.table = table.into();
        self
    }

    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    #[must_use]
    pub fn connection_type(&self) -> Option<DriverKind> {
        self.conn.connection_type()
    }

    /// Message of the most recent failed statement on this model's connection.
    #[must_use]
    pub fn get_error(&self) -> Option<&str> {
        self.conn.last_error()
    }

    /// Close the connection. Safe to call more than once.
    ///
    /// # Errors
    /// See [`Connection::close`].
    pub fn close(&mut self) -> Result<(), EntityError> {
        self.conn.close()
    }

    /// Render a non-null value as a literal using the active driver.
    ///
    /// # Errors
    /// See [`Connection::escape`].
    pub fn escape(&self, value: &RowValues) -> Result<String, EntityError> {
        self.conn.escape(value)
    }

    /// Start a SELECT of `columns` from the default table.
    pub fn select<S: AsRef<str>>(&mut self, columns: &[S]) -> SelectQuery<'_> {
        SelectQuery::new(self, columns.iter().map(|c| c.as_ref().to_owned()).collect())
    }

    /// Start an INSERT of `data` into the default table.
    pub fn insert(&mut self, data: impl Into<Record>) -> InsertQuery<'_> {
        InsertQuery::new(self, data.into())
    }

    /// Start an UPDATE of the default table. Without a filter every row is updated.
    pub fn update(&mut self, data: impl Into<Assignments>) -> UpdateQuery<'_> {
        UpdateQuery::new(self, data.into())
    }

    /// Start a DELETE from the default table. An empty filter deletes every row.
    pub fn delete(&mut self, filter: impl Into<Filter>) -> DeleteQuery<'_> {
        DeleteQuery::new(self, filter.into())
    }

    /// Row count of the default table.
    ///
    /// # Errors
    /// Propagates statement and connection errors.
    pub fn num_rows(&mut self) -> Result<i64, EntityError> {
        self.num_rows_where(Filter::None, None)
    }

    /// Row count matching `filter`, in `table` or the default table.
    ///
    /// # Errors
    /// Propagates statement and connection errors.
    pub fn num_rows_where(
        &mut self,
        filter: impl Into<Filter>,
        table: Option<&str>,
    ) -> Result<i64, EntityError> {
        let mut query = self.select(&["count(*)"]).filter(filter);
        if let Some(table) = table {
            query = query.table(table);
        }
        let rows = query.fetch()?;
        rows.scalar()
            .and_then(RowValues::as_int)
            .copied()
            .ok_or_else(|| EntityError::ExecutionError("count(*) returned no value".into()))
    }

    /// Row id of the most recent successful INSERT on this connection.
    ///
    /// # Errors
    /// Fails on a closed or unconfigured connection.
    pub fn last_id(&self) -> Result<i64, EntityError> {
        self.conn.last_insert_id()
    }

    /// `id_column` of the row with the highest ROWID, independent of any earlier statement.
    /// `None` for an empty table.
    ///
    /// # Errors
    /// Propagates statement and connection errors.
    pub fn bottom_row(
        &mut self,
        id_column: &str,
        table: Option<&str>,
    ) -> Result<Option<RowValues>, EntityError> {
        let table = table.unwrap_or(self.meta.table.as_str()).to_owned();
        let select = build_select(&self.conn, &table, &[id_column], None, None, None)?;
        let sql = format!("{select} ORDER BY ROWID DESC LIMIT 1");
        let rows = self.smart_query(&sql)?.into_rows()?;
        Ok(rows.first().and_then(|row| row.get(id_column)).cloned())
    }

    /// Run any statement through the dispatching executor.
    ///
    /// # Errors
    /// See [`smart_query`].
    pub fn smart_query(&mut self, sql: &str) -> Result<QueryOutcome, EntityError> {
        smart_query(&mut self.conn, sql)
    }

    /// Run a statement with driver-bound parameters instead of inlined values.
    ///
    /// # Errors
    /// See [`smart_query_with_params`].
    pub fn smart_query_with_params(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<QueryOutcome, EntityError> {
        smart_query_with_params(&mut self.conn, sql, params)
    }

    /// Execute one or more statements, discarding any result.
    ///
    /// # Errors
    /// Returns the driver error, also available from [`get_error`](Model::get_error).
    pub fn exec(&mut self, sql: &str) -> Result<(), EntityError> {
        tracing::debug!(sql, "exec");
        self.conn.execute_batch(sql)
    }
}
