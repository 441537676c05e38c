// SQLite module - the rusqlite-backed driver
//
// - params: Parameter conversion between entity values and rusqlite values
// - query: Result extraction and building
// - executor: Statement execution against an open connection

pub mod executor;
pub mod params;
pub mod query;

use std::path::Path;

pub use executor::{execute_batch, execute_dml, execute_select, last_insert_id, quote};
pub use params::Params;
pub use query::build_result_set;

use crate::error::EntityError;

/// A single rusqlite connection to the database file.
#[derive(Debug)]
pub struct SqliteDriver {
    conn: rusqlite::Connection,
}

impl SqliteDriver {
    /// Open (creating if needed) the database file at `path`.
    ///
    /// # Errors
    /// Returns `EntityError::ConnectionError` if rusqlite cannot open the file.
    pub fn open(path: &Path) -> Result<Self, EntityError> {
        let conn = rusqlite::Connection::open(path).map_err(|e| {
            EntityError::ConnectionError(format!(
                "Failed to open SQLite database {}: {e}",
                path.display()
            ))
        })?;
        Ok(Self { conn })
    }

    #[must_use]
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.conn
    }

    /// Close the connection, surfacing any error rusqlite reports while finalizing.
    ///
    /// # Errors
    /// Returns `EntityError::SqliteError` if the close fails.
    pub fn close(self) -> Result<(), EntityError> {
        self.conn
            .close()
            .map_err(|(_, e)| EntityError::SqliteError(e))
    }
}
