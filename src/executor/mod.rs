//! The dispatching executor: run a statement and normalize its result by leading keyword.

mod dispatch;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::EntityError;
use crate::results::ResultSet;

pub use dispatch::{smart_query, smart_query_with_params};

static LEADING_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(SELECT|INSERT|UPDATE|DELETE)\b").expect("keyword pattern is valid")
});

/// Statement kinds the executor normalizes differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl StatementKind {
    /// Classify by the case-insensitive leading keyword, ignoring leading whitespace.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        let Some(caps) = LEADING_KEYWORD.captures(sql) else {
            return StatementKind::Other;
        };
        match caps[1].to_ascii_uppercase().as_str() {
            "SELECT" => StatementKind::Select,
            "INSERT" => StatementKind::Insert,
            "UPDATE" => StatementKind::Update,
            "DELETE" => StatementKind::Delete,
            _ => StatementKind::Other,
        }
    }
}

/// Normalized result of [`smart_query`].
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// Every row of a SELECT, in order. Empty when nothing matched.
    Rows(ResultSet),
    /// Row id assigned by an INSERT.
    LastInsertId(i64),
    /// Rows changed by an UPDATE or DELETE.
    RowsAffected(usize),
    /// Whatever the plain query primitive produced for any other statement.
    Raw(ResultSet),
}

impl QueryOutcome {
    fn mismatch(&self, wanted: &str) -> EntityError {
        EntityError::ExecutionError(format!("expected {wanted}, statement produced {self:?}"))
    }

    /// The rows of a SELECT.
    ///
    /// # Errors
    /// Returns `EntityError::ExecutionError` for any other outcome.
    pub fn into_rows(self) -> Result<ResultSet, EntityError> {
        match self {
            QueryOutcome::Rows(rows) => Ok(rows),
            other => Err(other.mismatch("rows")),
        }
    }

    /// The row id produced by an INSERT.
    ///
    /// # Errors
    /// Returns `EntityError::ExecutionError` for any other outcome.
    pub fn into_last_insert_id(self) -> Result<i64, EntityError> {
        match self {
            QueryOutcome::LastInsertId(id) => Ok(id),
            other => Err(other.mismatch("a last insert id")),
        }
    }

    /// The affected-row count of an UPDATE or DELETE.
    ///
    /// # Errors
    /// Returns `EntityError::ExecutionError` for any other outcome.
    pub fn into_rows_affected(self) -> Result<usize, EntityError> {
        match self {
            QueryOutcome::RowsAffected(n) => Ok(n),
            other => Err(other.mismatch("an affected row count")),
        }
    }
}
