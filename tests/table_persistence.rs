//! Saving, resuming and exporting learned tables.

mod common;

use std::path::Path;

use common::*;
use sparse_agent::{
    Error,
    adapters::{InMemoryRepository, MsgPackRepository},
    app::{App, ControllerConfig},
    catalog::ActionCatalog,
    export::{TableExporter, TableFormat},
    pipeline::{EpisodeConfig, EpisodeRunner},
    ports::{DEFAULT_TABLE_FILE, TableRepository},
    q_learning::SavedQTable,
};
use tempfile::TempDir;

fn trained_app_run(app: &App, path: &Path, episodes: usize) -> SavedQTable {
    let config = ControllerConfig::new().with_table_path(path);
    let mut executor = app.create_executor(&config).unwrap();
    let mut env = ScriptedEnvironment::new(11, 1.0);
    EpisodeRunner::new(EpisodeConfig {
        episodes,
        max_ticks: Some(500),
    })
    .run(&mut executor, &mut env)
    .unwrap();
    executor.saved_table()
}

#[test]
fn test_episode_end_writes_msgpack_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join(DEFAULT_TABLE_FILE);
    let app = App::for_testing().with_default_seed(4).build();

    let in_memory = trained_app_run(&app, &path, 2);

    assert!(path.is_file());
    let on_disk = MsgPackRepository::new().load(&path).unwrap();
    assert_eq!(on_disk, in_memory);
    assert!(on_disk.rows.contains_key("terminal"));
}

#[test]
fn test_resumed_table_keeps_learned_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("resume.msgpack");
    let app = App::for_testing().with_default_seed(8).build();

    let first = trained_app_run(&app, &path, 1);
    let resumed = app
        .create_executor(&ControllerConfig::new().with_table_path(&path))
        .unwrap();

    assert_eq!(resumed.saved_table().rows, first.rows);
}

#[test]
fn test_loaded_rows_round_trip_exactly() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(12)
        .build();
    let saved = trained_app_run(&app, Path::new("mem"), 3);

    let table = app.load_table(Path::new("mem")).unwrap();
    let reloaded = SavedQTable::from_table(&table, &ActionCatalog::standard());

    assert_eq!(reloaded.rows, saved.rows);
    for (state, row) in &saved.rows {
        assert_eq!(row.len(), 11, "row {state}");
    }
}

#[test]
fn test_table_for_other_catalog_is_rejected() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();
    let mut saved = app
        .init_table(&ControllerConfig::new(), Path::new("t"))
        .unwrap();

    saved.actions.swap(1, 2);
    repo.save(&saved, Path::new("t")).unwrap();

    let result = app.create_executor(&ControllerConfig::new().with_table_path("t"));
    assert!(matches!(result, Err(Error::CatalogMismatch { .. })));
}

#[test]
fn test_short_row_is_rejected() {
    let repo = InMemoryRepository::new();
    let app = App::for_testing().with_repository(repo.clone()).build();
    let mut saved = app
        .init_table(&ControllerConfig::new(), Path::new("t"))
        .unwrap();

    saved.rows.insert("[1,0,0,0]".to_string(), vec![0.0; 10]);
    repo.save(&saved, Path::new("t")).unwrap();

    assert!(matches!(
        app.load_table(Path::new("t")),
        Err(Error::RowWidthMismatch { found: 10, .. })
    ));
}

#[test]
fn test_failed_export_is_reported_after_learning() {
    let repo = InMemoryRepository::failing();
    let app = App::for_testing()
        .with_repository(repo.clone())
        .with_default_seed(6)
        .build();
    let mut executor = app
        .create_executor(&ControllerConfig::new().with_table_path("t"))
        .unwrap();
    let mut env = ScriptedEnvironment::new(5, -1.0);

    let result = EpisodeRunner::default().run_episode(1, &mut executor, &mut env);

    assert!(matches!(result, Err(Error::Persistence { .. })));
    assert!(executor.table().contains(&sparse_agent::StateKey::terminal()));
    assert_eq!(repo.count(), 0);

    repo.set_fail_saves(false);
    executor.export_table().unwrap();
    assert_eq!(repo.count(), 1);
}

#[test]
fn test_csv_and_json_exports_from_saved_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let table_path = temp_dir.path().join("table.msgpack");
    let app = App::for_testing().with_default_seed(21).build();
    let saved = trained_app_run(&app, &table_path, 2);

    let csv_path = temp_dir.path().join("table.csv");
    TableExporter::export(&saved, &csv_path, TableFormat::Csv).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), saved.size() + 1);
    assert!(csv.starts_with("state,donothing,"));

    let json_path = temp_dir.path().join("table.json");
    TableExporter::export(&saved, &json_path, TableFormat::Json).unwrap();
    let parsed: SavedQTable =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.rows.len(), saved.rows.len());
}
