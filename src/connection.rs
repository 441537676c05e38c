//! Driver capability selection and the single live connection an entity owns.

use std::path::{Path, PathBuf};

use crate::config::DbOptions;
use crate::error::EntityError;
use crate::escape::{Quoter, render_value};
use crate::results::ResultSet;
use crate::types::{DriverKind, RowValues};

#[cfg(feature = "sqlite")]
use crate::sqlite::{self, SqliteDriver};
#[cfg(feature = "turso")]
use crate::turso::{self, TursoDriver};

/// The open driver, one variant per compiled-in client API.
#[derive(Debug)]
pub(crate) enum DriverHandle {
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteDriver),
    #[cfg(feature = "turso")]
    Turso(TursoDriver),
}

impl DriverHandle {
    fn open(kind: DriverKind, path: &Path) -> Result<Self, EntityError> {
        match kind {
            #[cfg(feature = "sqlite")]
            DriverKind::Sqlite => Ok(DriverHandle::Sqlite(SqliteDriver::open(path)?)),
            #[cfg(feature = "turso")]
            DriverKind::Turso => Ok(DriverHandle::Turso(TursoDriver::open(path)?)),
            #[allow(unreachable_patterns)]
            other => Err(EntityError::Unimplemented(format!(
                "driver '{other}' is not compiled into this build"
            ))),
        }
    }

    fn kind(&self) -> DriverKind {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(_) => DriverKind::Sqlite,
            #[cfg(feature = "turso")]
            DriverHandle::Turso(_) => DriverKind::Turso,
        }
    }

    fn query(&self, sql: &str, params: &[RowValues]) -> Result<ResultSet, EntityError> {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(ref driver) => {
                sqlite::execute_select(driver.connection(), sql, params)
            }
            #[cfg(feature = "turso")]
            DriverHandle::Turso(ref driver) => turso::execute_select(driver, sql, params),
        }
    }

    fn execute(&self, sql: &str, params: &[RowValues]) -> Result<usize, EntityError> {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(ref driver) => sqlite::execute_dml(driver.connection(), sql, params),
            #[cfg(feature = "turso")]
            DriverHandle::Turso(ref driver) => turso::execute_dml(driver, sql, params),
        }
    }

    fn execute_batch(&self, sql: &str) -> Result<(), EntityError> {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(ref driver) => sqlite::execute_batch(driver.connection(), sql),
            #[cfg(feature = "turso")]
            DriverHandle::Turso(ref driver) => turso::execute_batch(driver, sql),
        }
    }

    fn last_insert_id(&self) -> Result<i64, EntityError> {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(ref driver) => Ok(sqlite::last_insert_id(driver.connection())),
            #[cfg(feature = "turso")]
            DriverHandle::Turso(ref driver) => turso::last_insert_id(driver),
        }
    }

    fn quote(&self, text: &str) -> Result<String, EntityError> {
        match *self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(ref driver) => sqlite::quote(driver.connection(), text),
            #[cfg(feature = "turso")]
            DriverHandle::Turso(ref driver) => turso::quote(driver, text),
        }
    }

    fn close(self) -> Result<(), EntityError> {
        match self {
            #[cfg(feature = "sqlite")]
            DriverHandle::Sqlite(driver) => driver.close(),
            #[cfg(feature = "turso")]
            DriverHandle::Turso(driver) => {
                driver.close();
                Ok(())
            }
        }
    }
}

#[derive(Debug)]
enum ConnectionState {
    Open(DriverHandle),
    Closed(DriverKind),
    Unconfigured(String),
}

/// The one database connection owned by a [`Model`](crate::model::Model).
///
/// The driver is chosen once, when the connection is opened, and never re-probed. Every
/// operation after [`close`](Connection::close), or on a connection that never opened, fails.
#[derive(Debug)]
pub struct Connection {
    state: ConnectionState,
    path: PathBuf,
    last_error: Option<String>,
}

impl Connection {
    /// Open the configured database file with the configured driver, or the first
    /// compiled-in driver in [`DriverKind::PRIORITY`] order.
    ///
    /// # Errors
    /// - `EntityError::Unconfigured` when no driver is compiled in.
    /// - `EntityError::Unimplemented` when the configured driver is not compiled in.
    /// - `EntityError::ConnectionError` when the driver cannot open the file.
    pub fn open(opts: &DbOptions) -> Result<Self, EntityError> {
        let kind = match opts.driver {
            Some(kind) => kind,
            None => DriverKind::probe().ok_or_else(|| {
                EntityError::Unconfigured(
                    "no database driver available (enable the `sqlite` or `turso` feature)".into(),
                )
            })?,
        };
        let handle = DriverHandle::open(kind, &opts.db_path)?;
        tracing::info!(driver = %kind, path = %opts.db_path.display(), "database connection opened");
        Ok(Self {
            state: ConnectionState::Open(handle),
            path: opts.db_path.clone(),
            last_error: None,
        })
    }

    /// Like [`open`](Connection::open), but a failure leaves an unconfigured connection that
    /// reports the failure from every later call.
    #[must_use]
    pub fn open_or_unconfigured(opts: &DbOptions) -> Self {
        match Self::open(opts) {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!(path = %opts.db_path.display(), error = %e, "database connection unconfigured");
                let mut conn = Self::unconfigured(&opts.db_path, e.to_string());
                conn.last_error = Some(e.to_string());
                conn
            }
        }
    }

    /// A connection that never opened.
    #[must_use]
    pub fn unconfigured(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            state: ConnectionState::Unconfigured(reason.into()),
            path: path.into(),
            last_error: None,
        }
    }

    /// The driver tag, fixed when the connection was opened. Still reported after close;
    /// `None` only for a connection that never opened.
    #[must_use]
    pub fn connection_type(&self) -> Option<DriverKind> {
        match &self.state {
            ConnectionState::Open(handle) => Some(handle.kind()),
            ConnectionState::Closed(kind) => Some(*kind),
            ConnectionState::Unconfigured(_) => None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, ConnectionState::Open(_))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Message of the most recent failed operation, cleared by the next one that succeeds.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Release the driver. Closing an already closed or unconfigured connection is a no-op.
    ///
    /// # Errors
    /// Returns the driver's error if it fails while closing; the connection is closed anyway.
    pub fn close(&mut self) -> Result<(), EntityError> {
        let kind = match &self.state {
            ConnectionState::Open(handle) => handle.kind(),
            ConnectionState::Closed(_) | ConnectionState::Unconfigured(_) => return Ok(()),
        };
        let previous = std::mem::replace(&mut self.state, ConnectionState::Closed(kind));
        if let ConnectionState::Open(handle) = previous {
            handle.close()?;
            tracing::info!(driver = %kind, path = %self.path.display(), "database connection closed");
        }
        Ok(())
    }

    fn handle(&self) -> Result<&DriverHandle, EntityError> {
        match &self.state {
            ConnectionState::Open(handle) => Ok(handle),
            ConnectionState::Closed(_) => Err(EntityError::ConnectionClosed),
            ConnectionState::Unconfigured(reason) => Err(EntityError::Unconfigured(reason.clone())),
        }
    }

    fn track<T>(&mut self, result: Result<T, EntityError>) -> Result<T, EntityError> {
        match &result {
            Ok(_) => self.last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "statement failed");
                self.last_error = Some(e.to_string());
            }
        }
        result
    }

    /// Run a statement and collect its rows.
    ///
    /// # Errors
    /// Returns the driver error, also recorded for [`last_error`](Connection::last_error).
    pub fn query(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet, EntityError> {
        let result = self.handle().and_then(|h| h.query(sql, params));
        self.track(result)
    }

    /// Execute a statement and return the rows it changed.
    ///
    /// # Errors
    /// Returns the driver error, also recorded for [`last_error`](Connection::last_error).
    pub fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, EntityError> {
        let result = self.handle().and_then(|h| h.execute(sql, params));
        self.track(result)
    }

    /// Execute one or more statements, discarding any result.
    ///
    /// # Errors
    /// Returns the driver error, also recorded for [`last_error`](Connection::last_error).
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), EntityError> {
        let result = self.handle().and_then(|h| h.execute_batch(sql));
        self.track(result)
    }

    /// Row id of the most recent successful INSERT on this connection.
    ///
    /// # Errors
    /// Fails on a closed or unconfigured connection.
    pub fn last_insert_id(&self) -> Result<i64, EntityError> {
        self.handle()?.last_insert_id()
    }

    /// Render a non-null value as a literal using the active driver's quoting.
    ///
    /// # Errors
    /// Fails on a closed or unconfigured connection, for `NULL`, and for non-finite floats.
    pub fn escape(&self, value: &RowValues) -> Result<String, EntityError> {
        render_value(self, value)
    }
}

impl Quoter for Connection {
    fn quote(&self, text: &str) -> Result<String, EntityError> {
        self.handle()?.quote(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_connection_fails_every_call() {
        let mut conn = Connection::unconfigured("missing.db", "no driver");
        assert_eq!(conn.connection_type(), None);
        assert!(matches!(conn.query("SELECT 1", &[]), Err(EntityError::Unconfigured(_))));
        assert!(matches!(conn.execute("DELETE FROM t", &[]), Err(EntityError::Unconfigured(_))));
        assert!(conn.escape(&RowValues::Text("x".into())).is_err());
        assert!(conn.last_error().is_some());
        assert!(conn.close().is_ok());
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn close_is_idempotent_and_keeps_tag() -> Result<(), EntityError> {
        let opts = DbOptions::new(":memory:").with_driver(DriverKind::Sqlite);
        let mut conn = Connection::open(&opts)?;
        assert!(conn.is_open());
        conn.close()?;
        conn.close()?;
        assert_eq!(conn.connection_type(), Some(DriverKind::Sqlite));
        assert!(matches!(conn.query("SELECT 1", &[]), Err(EntityError::ConnectionClosed)));
        Ok(())
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_escape_uses_engine_quoting() -> Result<(), EntityError> {
        let conn = Connection::open(&DbOptions::new(":memory:").with_driver(DriverKind::Sqlite))?;
        assert_eq!(conn.escape(&RowValues::Text("it's".into()))?, "'it''s'");
        assert_eq!(conn.escape(&RowValues::Int(4))?, "4");
        Ok(())
    }
}
