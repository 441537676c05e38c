//! Table-per-entity CRUD over one embedded SQLite database file.
//!
//! Each entity type gets a [`Model`](model::Model): a default table, advisory metadata, and
//! select/insert/update/delete bound to that table. Statements are built as text with values
//! escaped inline, then run through a dispatcher that normalizes the result by statement kind
//! (rows, last insert id, affected rows).
//!
//! Two client drivers are supported and chosen once per connection, in priority order:
//! `rusqlite` (feature `sqlite`, default) and `turso` (feature `turso`).
//!
//! ```rust,no_run
//! use sql_entity::prelude::*;
//!
//! # fn demo() -> Result<(), EntityError> {
//! let opts = DbOptions::builder("app.db").finish();
//! let mut widgets = Model::try_new(EntityMeta::named("Widgets"), &opts)?;
//! let id = widgets.insert([("name", RowValues::from("bolt")), ("qty", 5.into())]).run()?;
//! assert_eq!(widgets.num_rows()?, 1);
//! widgets.delete([("id", id)]).run()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod escape;
pub mod executor;
pub mod model;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "turso")]
pub mod turso;

pub use config::{DbOptions, DbOptionsBuilder};
pub use connection::Connection;
pub use error::EntityError;
pub use executor::{QueryOutcome, StatementKind, smart_query, smart_query_with_params};
pub use model::{Entity, EntityMeta, EntityRegistry, Model, Operation};
pub use results::{ResultSet, Row};
pub use statement::{Assignments, Filter, Record};
pub use types::{DriverKind, RowValues};
