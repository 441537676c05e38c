#![allow(dead_code)]

use serde_json::json;
use sql_entity::prelude::*;
use tempfile::TempDir;

pub const WIDGETS_DDL: &str =
    "CREATE TABLE widgets (id INTEGER PRIMARY KEY, name TEXT, qty INTEGER)";

/// A fresh `widgets` model over a file inside `dir`.
pub fn widgets_model(dir: &TempDir, driver: DriverKind) -> Result<Model, EntityError> {
    let opts = DbOptions::builder(dir.path().join("widgets.db"))
        .driver(driver)
        .finish();
    let mut model = Model::try_new(EntityMeta::named("Widgets"), &opts)?;
    model.exec(WIDGETS_DDL)?;
    Ok(model)
}

/// Insert, count, update, select, delete, count again.
pub fn widgets_round_trip(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    let id = model
        .insert([("name", RowValues::from("bolt")), ("qty", 5.into())])
        .run()?;
    assert_eq!(id, 1);
    assert_eq!(model.num_rows()?, 1);

    let changed = model.update([("qty", 10)]).filter([("id", 1)]).run()?;
    assert_eq!(changed, 1);

    let rows = model.select(&["qty"]).filter([("id", 1)]).fetch()?;
    assert_eq!(rows.to_json(), json!([{"qty": 10}]));

    let removed = model.delete([("id", 1)]).run()?;
    assert_eq!(removed, 1);
    assert_eq!(model.num_rows()?, 0);
    Ok(())
}

/// Affected-row counts for 0, 1 and several matching rows.
pub fn affected_counts_are_exact(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    for (name, qty) in [("a", 1), ("b", 1), ("c", 2)] {
        model.insert([("name", RowValues::from(name)), ("qty", qty.into())]).run()?;
    }

    assert_eq!(model.update([("name", "none")]).filter([("qty", 99)]).run()?, 0);
    assert_eq!(model.update([("name", "two")]).filter([("qty", 2)]).run()?, 1);
    assert_eq!(model.update([("name", "one")]).filter([("qty", 1)]).run()?, 2);
    assert_eq!(model.delete(Filter::None).run()?, 3);
    Ok(())
}

/// Quotes in text survive the trip into and out of the database unchanged.
pub fn quotes_round_trip(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    let nasty = "O'Reilly'); DROP TABLE widgets; --";
    let id = model
        .insert([("name", RowValues::from(nasty)), ("qty", 1.into())])
        .run()?;

    let rows = model.select(&["name"]).filter([("id", id)]).fetch()?;
    assert_eq!(rows.scalar(), Some(&RowValues::Text(nasty.to_string())));

    let rows = model.select(&["id"]).filter([("name", nasty)]).fetch()?;
    assert_eq!(rows.scalar(), Some(&RowValues::Int(id)));
    assert_eq!(model.num_rows()?, 1);
    Ok(())
}

/// Inserts report strictly increasing ids, and `last_id` follows them.
pub fn insert_ids_increase(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    let first = model.insert([("name", "a")]).run()?;
    let second = model.insert([("name", "b")]).run()?;
    assert!(second > first);
    assert_eq!(model.last_id()?, second);
    Ok(())
}

/// A SELECT that matches nothing is an empty set, not an error.
pub fn empty_select_is_empty(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    let rows = model.select(&["*"]).filter([("id", 42)]).fetch()?;
    assert!(rows.is_empty());
    assert_eq!(rows.to_json(), json!([]));
    assert_eq!(model.get_error(), None);
    Ok(())
}

/// A failed statement is reported by `get_error` until the next success clears it.
pub fn failure_sets_and_clears_error(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    assert_eq!(model.get_error(), None);

    let err = model.smart_query("SELECT * FROM nope").err().ok_or("expected failure")?;
    assert!(err.is_execution_error());
    assert!(model.get_error().is_some_and(|msg| msg.contains("nope")));

    model.num_rows()?;
    assert_eq!(model.get_error(), None);
    Ok(())
}

/// Statements outside SELECT/INSERT/UPDATE/DELETE come back as raw results.
pub fn other_statements_are_raw(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    match model.smart_query("CREATE TABLE extra (a)")? {
        QueryOutcome::Raw(rows) => assert!(rows.is_empty()),
        other => panic!("expected raw rows, got {other:?}"),
    }
    match model.smart_query("PRAGMA table_info(widgets)")? {
        QueryOutcome::Raw(rows) => assert_eq!(rows.len(), 3),
        other => panic!("expected raw rows, got {other:?}"),
    }
    Ok(())
}

/// `RETURNING` statements succeed once and report the id or affected count.
pub fn returning_clause_counts_once(model: &mut Model) -> Result<(), Box<dyn std::error::Error>> {
    let id = model
        .smart_query("INSERT INTO widgets (name, qty) VALUES ('r', 1) RETURNING id")?
        .into_last_insert_id()?;
    assert_eq!(id, 1);
    assert_eq!(model.get_error(), None);
    assert_eq!(model.num_rows()?, 1);

    model.insert([("name", "s")]).run()?;
    let changed = model
        .smart_query("UPDATE widgets SET qty = 9 RETURNING id")?
        .into_rows_affected()?;
    assert_eq!(changed, 2);

    let removed = model
        .smart_query("DELETE FROM widgets WHERE name = 'r' RETURNING name")?
        .into_rows_affected()?;
    assert_eq!(removed, 1);
    assert_eq!(model.num_rows()?, 1);
    Ok(())
}
