#![cfg(feature = "sqlite")]

mod common;

use serde_json::json;
use sql_entity::prelude::*;
use tempfile::tempdir;

use common::{
    affected_counts_are_exact, empty_select_is_empty, failure_sets_and_clears_error,
    insert_ids_increase, other_statements_are_raw, quotes_round_trip, returning_clause_counts_once,
    widgets_model, widgets_round_trip,
};

#[test]
fn sqlite_widgets_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    assert_eq!(model.connection_type(), Some(DriverKind::Sqlite));
    widgets_round_trip(&mut model)
}

#[test]
fn sqlite_affected_counts() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    affected_counts_are_exact(&mut model)
}

#[test]
fn sqlite_quotes_round_trip() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    quotes_round_trip(&mut model)
}

#[test]
fn sqlite_insert_ids_increase() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    insert_ids_increase(&mut model)
}

#[test]
fn sqlite_empty_select() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    empty_select_is_empty(&mut model)
}

#[test]
fn sqlite_failure_reported_by_get_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    failure_sets_and_clears_error(&mut model)
}

#[test]
fn sqlite_other_statements_are_raw() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    other_statements_are_raw(&mut model)
}

#[test]
fn sqlite_returning_clause_counts_once() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    returning_clause_counts_once(&mut model)
}

#[test]
fn select_limit_offset_and_other_table() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    for qty in 1..=5 {
        model.insert([("name", RowValues::from("w")), ("qty", qty.into())]).run()?;
    }
    // `LIMIT 1, 2`: skip one row, return two
    let rows = model.select(&["qty"]).limit(1).offset(2).fetch()?;
    assert_eq!(rows.to_json(), json!([{"qty": 2}, {"qty": 3}]));
    let rows = model.select(&["qty"]).offset(2).fetch()?;
    assert_eq!(rows.len(), 5);

    model.exec("CREATE TABLE gadgets (id INTEGER PRIMARY KEY, label TEXT)")?;
    model.insert([("label", "knob")]).table("gadgets").run()?;
    assert_eq!(model.num_rows_where(Filter::None, Some("gadgets"))?, 1);
    assert_eq!(model.num_rows_where([("qty", 3)], None)?, 1);

    model.from("gadgets");
    assert_eq!(model.table(), "gadgets");
    assert_eq!(model.num_rows()?, 1);
    Ok(())
}

#[test]
fn bottom_row_reads_highest_rowid() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    assert_eq!(model.bottom_row("id", None)?, None);
    model.insert([("name", "a")]).run()?;
    let last = model.insert([("name", "b")]).run()?;
    model.update([("qty", 1)]).run()?;
    assert_eq!(model.bottom_row("id", None)?, Some(RowValues::Int(last)));
    Ok(())
}

#[test]
fn bound_parameters_bypass_escaping() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    let id = model
        .smart_query_with_params(
            "INSERT INTO widgets (name, qty) VALUES (?1, ?2)",
            &[RowValues::from("it's"), RowValues::from(7)],
        )?
        .into_last_insert_id()?;
    let rows = model
        .smart_query_with_params("SELECT name, qty FROM widgets WHERE id = ?1", &[RowValues::Int(id)])?
        .into_rows()?;
    assert_eq!(rows.to_json(), json!([{"name": "it's", "qty": 7}]));
    Ok(())
}

#[test]
fn escape_matches_engine_quoting() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let model = widgets_model(&dir, DriverKind::Sqlite)?;
    assert_eq!(model.escape(&"a'b".into())?, "'a''b'");
    assert_eq!(model.escape(&RowValues::Bool(true))?, "1");
    assert!(model.escape(&RowValues::Null).is_err());
    Ok(())
}

#[test]
fn closed_model_rejects_calls_but_keeps_driver_tag() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    model.close()?;
    model.close()?;
    assert_eq!(model.connection_type(), Some(DriverKind::Sqlite));
    assert!(matches!(model.num_rows(), Err(EntityError::ConnectionClosed)));
    assert!(matches!(model.last_id(), Err(EntityError::ConnectionClosed)));
    Ok(())
}

#[test]
fn unopenable_file_leaves_model_unconfigured() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let opts = DbOptions::builder(dir.path().join("missing").join("deeper").join("app.db"))
        .driver(DriverKind::Sqlite)
        .finish();
    let mut model = Model::new(EntityMeta::named("Widgets"), &opts);
    assert_eq!(model.connection_type(), None);
    assert!(model.get_error().is_some());
    assert!(matches!(model.num_rows(), Err(EntityError::Unconfigured(_))));
    assert!(Model::try_new(EntityMeta::named("Widgets"), &opts).is_err());
    Ok(())
}

#[test]
fn data_survives_reopening_the_file() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let mut model = widgets_model(&dir, DriverKind::Sqlite)?;
    model.insert([("name", "kept")]).run()?;
    model.close()?;

    let opts = DbOptions::builder(dir.path().join("widgets.db")).finish();
    let mut reopened = Model::try_new(EntityMeta::named("Widgets"), &opts)?;
    assert_eq!(reopened.connection_type(), Some(DriverKind::Sqlite));
    assert_eq!(reopened.num_rows()?, 1);
    Ok(())
}
