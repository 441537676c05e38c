//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::{DbOptions, DbOptionsBuilder};
pub use crate::connection::Connection;
pub use crate::error::EntityError;
pub use crate::escape::{Quoter, SqlLiteral};
pub use crate::executor::{QueryOutcome, StatementKind, smart_query, smart_query_with_params};
pub use crate::model::{
    DeleteQuery, Entity, EntityMeta, EntityRegistry, InsertQuery, Model, Operation, SelectQuery,
    UpdateQuery,
};
pub use crate::results::{ResultSet, Row};
pub use crate::statement::{
    Assignments, Filter, Record, build_delete, build_insert, build_select, build_update,
    render_filter,
};
pub use crate::types::{DriverKind, RowValues};
