//! Persisting and reloading merged tables.

use std::fs;

use access_ingest::{ProfileSource, SqliteProfileSource};
use access_store::{StoreError, fingerprint, load_table, persist, stage_profiles};
use polars::prelude::{Column, DataFrame, DataType, IntoColumn, NamedFrom, Series};

fn frame(columns: Vec<Column>) -> DataFrame {
    DataFrame::new(columns).expect("frame")
}

fn merged_sample() -> DataFrame {
    frame(vec![
        Series::new("patient_id".into(), vec![1i64, 2]).into_column(),
        Series::new("country_profile".into(), vec!["FR", "DE"]).into_column(),
        Series::new("age".into(), vec![Some(34i64), None]).into_column(),
        Series::new("satisfaction_score".into(), vec![4.0f64, 4.0]).into_column(),
        Series::new("issue_type".into(), vec![Some("audio"), None]).into_column(),
    ])
}

#[test]
fn persisted_table_reloads_identically() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = dir.path().join("access_project.db");
    let df = merged_sample();

    let report = persist(&database, "merged_access_data", &df).expect("persist");
    assert_eq!(report.rows, 2);
    assert_eq!(report.columns, 5);

    let reloaded = load_table(&database, "merged_access_data").expect("load");
    assert!(reloaded.equals_missing(&df));
    assert_eq!(fingerprint(&reloaded), report.fingerprint);
}

#[test]
fn writes_replace_previous_contents() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = dir.path().join("access_project.db");
    persist(&database, "merged_access_data", &merged_sample()).expect("first write");

    let replacement = frame(vec![
        Series::new("patient_id".into(), vec![9i64]).into_column(),
        Series::new("satisfaction_score".into(), vec![2.5f64]).into_column(),
    ]);
    persist(&database, "merged_access_data", &replacement).expect("second write");

    let reloaded = load_table(&database, "merged_access_data").expect("load");
    assert_eq!(reloaded.height(), 1);
    assert_eq!(reloaded.width(), 2);
    assert!(reloaded.equals_missing(&replacement));
}

#[test]
fn empty_frame_becomes_queryable_empty_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = dir.path().join("nested").join("access_project.db");
    let empty = frame(vec![
        Series::new("patient_id".into(), Vec::<i64>::new()).into_column(),
        Series::new("satisfaction_score".into(), Vec::<f64>::new()).into_column(),
    ]);

    let report = persist(&database, "merged_access_data", &empty).expect("persist");
    assert_eq!(report.rows, 0);

    let reloaded = load_table(&database, "merged_access_data").expect("load");
    assert_eq!(reloaded.height(), 0);
    assert_eq!(
        reloaded.column("patient_id").unwrap().dtype(),
        &DataType::Int64
    );
    assert_eq!(
        reloaded.column("satisfaction_score").unwrap().dtype(),
        &DataType::Float64
    );
}

#[test]
fn repeated_writes_are_byte_for_byte_stable() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = dir.path().join("access_project.db");
    let first = persist(&database, "merged_access_data", &merged_sample()).expect("first");
    let second = persist(&database, "merged_access_data", &merged_sample()).expect("second");
    assert_eq!(first.fingerprint, second.fingerprint);
}

#[test]
fn missing_table_and_database_are_reported() {
    let dir = tempfile::tempdir().expect("temp dir");
    let database = dir.path().join("access_project.db");

    let err = load_table(&database, "merged_access_data").unwrap_err();
    assert!(matches!(err, StoreError::DatabaseNotFound { .. }));

    persist(&database, "other", &merged_sample()).expect("persist");
    let err = load_table(&database, "merged_access_data").unwrap_err();
    assert!(matches!(err, StoreError::TableNotFound { .. }));
}

#[test]
fn staged_profiles_feed_the_sqlite_source() {
    let dir = tempfile::tempdir().expect("temp dir");
    let csv = dir.path().join("patient_profiles_europe.csv");
    fs::write(
        &csv,
        "patient_id,country,age,gender\n1,FR,34,female\n2,DE,51,male\n",
    )
    .expect("write csv");
    let database = dir.path().join("access_project.db");

    let report = stage_profiles(&csv, &database, "patient_profiles").expect("stage");
    assert_eq!(report.rows, 2);

    let profiles = SqliteProfileSource::new(&database, "patient_profiles")
        .load_profiles()
        .expect("load");
    assert_eq!(profiles.height(), 2);
    assert_eq!(fingerprint(&profiles), report.fingerprint);
}
