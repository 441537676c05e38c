// Turso module - the turso-backed driver
//
// This module mirrors the sqlite module structure:
// - params: Parameter conversion between entity values and turso values
// - query: Result extraction and building
// - executor: Statement execution against an open connection
//
// turso only exposes an async API. Each driver owns a current-thread tokio runtime and blocks
// on it, so callers see the same synchronous surface as the rusqlite driver.

pub mod executor;
pub mod params;
pub mod query;

use std::path::Path;

use tokio::runtime::{Builder as RuntimeBuilder, Handle, Runtime};

pub use executor::{execute_batch, execute_dml, execute_select, last_insert_id, quote};
pub use params::Params;
pub use query::build_result_set;

use crate::error::EntityError;

/// A turso database handle plus one connection to it.
///
/// turso is async, so the driver owns a current-thread tokio runtime and blocks on it. Calls
/// made from inside another tokio runtime return `EntityError::AsyncContext` instead of
/// blocking that runtime's thread.
pub struct TursoDriver {
    // Always `Some` until drop; released in order connection, database, runtime
    conn: Option<turso::Connection>,
    db: Option<turso::Database>,
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for TursoDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TursoDriver").finish_non_exhaustive()
    }
}

fn ensure_blocking_allowed(action: &str) -> Result<(), EntityError> {
    if Handle::try_current().is_ok() {
        return Err(EntityError::AsyncContext(format!(
            "turso driver cannot {action} while a tokio runtime is running on this thread"
        )));
    }
    Ok(())
}

impl TursoDriver {
    /// Open (creating if needed) the local database file at `path`.
    ///
    /// # Errors
    /// - `EntityError::AsyncContext` when called from inside a tokio runtime.
    /// - `EntityError::ConnectionError` if the runtime cannot start or turso cannot open or
    ///   connect to the file.
    pub fn open(path: &Path) -> Result<Self, EntityError> {
        ensure_blocking_allowed("open a database")?;
        let runtime = RuntimeBuilder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                EntityError::ConnectionError(format!("Failed to start Turso runtime: {e}"))
            })?;

        let db_path = path.to_string_lossy().into_owned();
        let db = runtime
            .block_on(turso::Builder::new_local(&db_path).build())
            .map_err(|e| {
                EntityError::ConnectionError(format!(
                    "Failed to create Turso database {db_path}: {e}"
                ))
            })?;

        let conn = db.connect().map_err(|e| {
            EntityError::ConnectionError(format!("Failed to connect Turso database: {e}"))
        })?;

        Ok(Self {
            conn: Some(conn),
            db: Some(db),
            runtime: Some(runtime),
        })
    }

    /// Run a future on this driver's runtime, handing it the connection.
    ///
    /// # Errors
    /// Returns `EntityError::AsyncContext` when called from inside a tokio runtime, otherwise
    /// whatever the future returns.
    pub(crate) fn block_on<'a, F, Fut, T>(&'a self, f: F) -> Result<T, EntityError>
    where
        F: FnOnce(&'a turso::Connection) -> Fut,
        Fut: std::future::Future<Output = Result<T, EntityError>> + 'a,
    {
        ensure_blocking_allowed("run a statement")?;
        let (Some(conn), Some(runtime)) = (self.conn.as_ref(), self.runtime.as_ref()) else {
            return Err(EntityError::ConnectionClosed);
        };
        runtime.block_on(f(conn))
    }

    /// Release the connection and database handle.
    pub fn close(self) {
        drop(self);
    }
}

impl Drop for TursoDriver {
    fn drop(&mut self) {
        drop(self.conn.take());
        drop(self.db.take());
        // Does not block, so dropping inside an async context is fine
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
