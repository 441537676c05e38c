use thiserror::Error;

#[cfg(feature = "sqlite")]
use rusqlite;
#[cfg(feature = "turso")]
use turso;

#[derive(Debug, Error)]
pub enum EntityError {
    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "turso")]
    #[error(transparent)]
    TursoError(#[from] turso::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unconfigured connection: {0}")]
    Unconfigured(String),

    #[error("Connection is closed")]
    ConnectionClosed,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error("Blocking call from inside an async runtime: {0}")]
    AsyncContext(String),
}

impl EntityError {
    /// True for failures reported by the database engine itself (as opposed to caller or
    /// configuration mistakes).
    #[must_use]
    pub fn is_execution_error(&self) -> bool {
        match self {
            #[cfg(feature = "sqlite")]
            EntityError::SqliteError(_) => true,
            #[cfg(feature = "turso")]
            EntityError::TursoError(_) => true,
            EntityError::ExecutionError(_) => true,
            _ => false,
        }
    }
}
