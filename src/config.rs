use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::connection::Connection;
use crate::error::EntityError;
use crate::types::DriverKind;

/// Environment variable naming the database file.
pub const DB_PATH_ENV: &str = "SQL_ENTITY_DB_PATH";
/// Environment variable forcing a driver (`sqlite` or `turso`).
pub const DRIVER_ENV: &str = "SQL_ENTITY_DRIVER";
/// Database file used when nothing else is configured.
pub const DEFAULT_DB_PATH: &str = "data/app.db";

static GLOBAL_OPTIONS: OnceLock<DbOptions> = OnceLock::new();

/// Options for opening the database file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbOptions {
    pub db_path: PathBuf,
    /// Driver to use; `None` probes in priority order.
    #[serde(default)]
    pub driver: Option<DriverKind>,
}

impl DbOptions {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            driver: None,
        }
    }

    #[must_use]
    pub fn with_driver(mut self, driver: DriverKind) -> Self {
        self.driver = Some(driver);
        self
    }

    #[must_use]
    pub fn builder(db_path: impl Into<PathBuf>) -> DbOptionsBuilder {
        DbOptionsBuilder::new(db_path)
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Parse options from a JSON document such as `{"db_path": "app.db", "driver": "turso"}`.
    ///
    /// # Errors
    /// Returns `EntityError::ConfigError` if the document does not deserialize.
    pub fn from_json(json: &str) -> Result<Self, EntityError> {
        serde_json::from_str(json)
            .map_err(|e| EntityError::ConfigError(format!("invalid database options: {e}")))
    }

    /// Read options from `SQL_ENTITY_DB_PATH` / `SQL_ENTITY_DRIVER`.
    ///
    /// Returns `Ok(None)` when no path is set.
    ///
    /// # Errors
    /// Returns `EntityError::ConfigError` if the driver variable names an unknown driver.
    pub fn from_env() -> Result<Option<Self>, EntityError> {
        let Ok(path) = std::env::var(DB_PATH_ENV) else {
            return Ok(None);
        };
        let mut opts = DbOptions::new(path);
        if let Ok(driver) = std::env::var(DRIVER_ENV) {
            let kind = DriverKind::from_str(driver.trim(), true).map_err(|e| {
                EntityError::ConfigError(format!("{DRIVER_ENV}={driver}: {e}"))
            })?;
            opts.driver = Some(kind);
        }
        Ok(Some(opts))
    }

    /// Install the process-wide default options. Only the first call wins.
    ///
    /// # Errors
    /// Returns `EntityError::ConfigError` if defaults were already installed.
    pub fn install_global(self) -> Result<(), EntityError> {
        GLOBAL_OPTIONS.set(self).map_err(|_| {
            EntityError::ConfigError("global database options already installed".into())
        })
    }

    /// The process-wide options: installed ones, else the environment, else
    /// [`DEFAULT_DB_PATH`].
    ///
    /// # Errors
    /// Propagates environment parsing errors.
    pub fn global() -> Result<Self, EntityError> {
        if let Some(opts) = GLOBAL_OPTIONS.get() {
            return Ok(opts.clone());
        }
        Ok(Self::from_env()?.unwrap_or_else(|| DbOptions::new(DEFAULT_DB_PATH)))
    }
}

/// Fluent builder for [`DbOptions`].
#[derive(Debug, Clone)]
pub struct DbOptionsBuilder {
    opts: DbOptions,
}

impl DbOptionsBuilder {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            opts: DbOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.opts.db_path = db_path.into();
        self
    }

    #[must_use]
    pub fn driver(mut self, driver: DriverKind) -> Self {
        self.opts.driver = Some(driver);
        self
    }

    #[must_use]
    pub fn finish(self) -> DbOptions {
        self.opts
    }

    /// Open a connection with these options.
    ///
    /// # Errors
    /// See [`Connection::open`].
    pub fn open(self) -> Result<Connection, EntityError> {
        Connection::open(&self.finish())
    }
}
