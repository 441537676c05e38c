#![cfg(feature = "turso")]

mod common;

use sql_entity::prelude::*;
use tempfile::tempdir;

use common::{
    affected_counts_are_exact, empty_select_is_empty, failure_sets_and_clears_error,
    insert_ids_increase, other_statements_are_raw, quotes_round_trip, returning_clause_counts_once,
    widgets_model, widgets_round_trip,
};

#[test]
fn turso_widgets_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    assert_eq!(model.connection_type(), Some(DriverKind::Turso));
    widgets_round_trip(&mut model)
}

#[test]
fn turso_affected_counts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    affected_counts_are_exact(&mut model)
}

#[test]
fn turso_quotes_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    quotes_round_trip(&mut model)
}

#[test]
fn turso_escape_uses_engine_quoting() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    assert_eq!(model.escape(&"a'b".into())?, "'a''b'");

    let engine = model
        .smart_query_with_params("SELECT quote(?1)", &[RowValues::from("it's")])?
        .into_rows()?;
    assert_eq!(
        engine.scalar().and_then(RowValues::as_text),
        Some(model.escape(&"it's".into())?.as_str())
    );
    Ok(())
}

#[test]
fn turso_close_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    let id = model.insert([("name", "x")]).run()?;
    assert_eq!(model.last_id()?, id);
    model.close()?;
    model.close()?;
    assert_eq!(model.connection_type(), Some(DriverKind::Turso));
    assert!(matches!(model.num_rows(), Err(EntityError::ConnectionClosed)));
    Ok(())
}

#[test]
fn turso_insert_ids_increase() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    insert_ids_increase(&mut model)
}

#[test]
fn turso_empty_select() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    empty_select_is_empty(&mut model)
}

#[test]
fn turso_failure_reported_by_get_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    failure_sets_and_clears_error(&mut model)
}

#[test]
fn turso_other_statements_are_raw() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    other_statements_are_raw(&mut model)
}

#[test]
fn turso_returning_clause_counts_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    returning_clause_counts_once(&mut model)
}

#[test]
fn turso_inside_tokio_runtime_errors_instead_of_panicking() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Turso)?;
    let rt = tokio::runtime::Builder::new_current_thread().build()?;

    let counted = rt.block_on(async { model.num_rows() });
    assert!(matches!(counted, Err(EntityError::AsyncContext(_))));

    let opts = DbOptions::builder(dir.path().join("other.db"))
        .driver(DriverKind::Turso)
        .finish();
    let opened = rt.block_on(async { Model::try_new(EntityMeta::named("Widgets"), &opts) });
    assert!(matches!(opened, Err(EntityError::AsyncContext(_))));

    // Outside the runtime the same model still works, and dropping it inside one is safe
    assert_eq!(model.num_rows()?, 0);
    rt.block_on(async move { drop(model) });
    Ok(())
}
