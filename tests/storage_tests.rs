//! Integration tests for on-disk persistence
//!
//! These tests verify the TOML catalog file, configuration loading and the
//! `PackageManager` facade that ties them to the importer.

mod common;

use common::{legacy_package, populated_catalog, temp_dir};
use pods_migrate::{Catalog, Collection, Config, EntityKind, PackageManager, Pod, Storage};
use serde_json::json;
use std::fs;

#[test]
fn test_catalog_round_trips_through_toml() {
    let dir = temp_dir();
    let storage = Storage::new(dir.path().join("catalog.toml"));
    let catalog = populated_catalog();

    storage.save(&catalog).unwrap();
    let loaded = storage.load().unwrap();

    assert_eq!(loaded, catalog);
}

#[test]
fn test_migrated_pod_round_trips_through_toml() {
    let dir = temp_dir();
    let path = dir.path().join("catalog.toml");
    let mut manager = PackageManager::open(&path, Config::default()).unwrap();
    manager.import(legacy_package(), false).unwrap();

    let reopened = PackageManager::open(&path, Config::default()).unwrap();
    assert_eq!(reopened.catalog(), manager.catalog());
    let pod: Pod = reopened.catalog().load_by_name("book_reviews").unwrap().unwrap();
    assert_eq!(pod.fields.len(), 13);
}

#[test]
fn test_null_values_are_pruned_on_save() {
    let dir = temp_dir();
    let storage = Storage::new(dir.path().join("catalog.toml"));
    let mut catalog = Catalog::new();
    let mut pod = Pod::new("books");
    pod.options.insert("detail_url".to_string(), json!(null));
    pod.options.insert("show_in_menu".to_string(), json!(1));
    catalog.save(pod).unwrap();

    storage.save(&catalog).unwrap();
    let loaded: Pod = storage
        .load()
        .unwrap()
        .load_by_name("books")
        .unwrap()
        .unwrap();

    assert!(!loaded.options.contains_key("detail_url"));
    assert_eq!(loaded.options["show_in_menu"], json!(1));
}

#[test]
fn test_missing_catalog_file_opens_empty() {
    let dir = temp_dir();
    let manager = PackageManager::open(dir.path().join("absent.toml"), Config::default()).unwrap();
    assert!(manager.catalog().is_empty());
}

#[test]
fn test_corrupt_catalog_file_is_an_error() {
    let dir = temp_dir();
    let path = dir.path().join("catalog.toml");
    fs::write(&path, "pods = [[[").unwrap();
    assert!(PackageManager::open(&path, Config::default()).is_err());
}

#[test]
fn test_config_file_supplies_builds_and_version() {
    let dir = temp_dir();
    let config_path = dir.path().join("pods-migrate.toml");
    fs::write(
        &config_path,
        r#"
schema_version = "2.2.0"

[legacy_builds]
"1300" = "1.13.0"
"#,
    )
    .unwrap();
    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.schema_version, "2.2.0");

    let mut manager = PackageManager::open(dir.path().join("catalog.toml"), config).unwrap();
    let summary = manager
        .import(
            json!({"meta": {"version": "1300"}, "pods": [{"name": "Events"}]}),
            false,
        )
        .unwrap()
        .unwrap();
    assert_eq!(summary.label(EntityKind::Pod, "events"), Some("Events"));

    let text = manager
        .export(&pods_migrate::Selection::all())
        .unwrap()
        .unwrap();
    assert!(text.contains(r#""version":"2.2.0""#));
}

#[test]
fn test_catalog_is_saved_when_records_are_skipped() {
    let dir = temp_dir();
    let path = dir.path().join("catalog.toml");
    let mut manager = PackageManager::open(&path, Config::default()).unwrap();

    let summary = manager
        .import(
            json!({
                "meta": {"version": "2.0.5"},
                "templates": [{"name": "list"}],
                "pages": [{"name": "///"}]
            }),
            false,
        )
        .unwrap()
        .unwrap();
    assert_eq!(summary.skipped.len(), 1);

    let reopened = PackageManager::open(&path, Config::default()).unwrap();
    assert_eq!(reopened.catalog().templates.len(), 1);
    assert!(reopened.catalog().pages.is_empty());
}

#[test]
fn test_failed_version_check_writes_nothing() {
    let dir = temp_dir();
    let path = dir.path().join("catalog.toml");
    let mut manager = PackageManager::open(&path, Config::default()).unwrap();

    let outcome = manager.import(json!({"meta": {"version": "1999"}, "templates": [{"name": "list"}]}), false);
    assert!(outcome.is_err());
    assert!(!path.exists());
}

#[test]
fn test_in_memory_catalog_matches_reopened_file() {
    let dir = temp_dir();
    let path = dir.path().join("catalog.toml");
    let mut manager = PackageManager::open(&path, Config::default()).unwrap();
    manager
        .import(
            json!({
                "meta": {"version": "2.0.5"},
                "pods": [{
                    "name": "books",
                    "fields": [{"name": "title", "type": "text", "options": {"default_value": null}}],
                    "options": {"nested": [{"k": null}], "detail_url": null}
                }]
            }),
            false,
        )
        .unwrap()
        .unwrap();

    let reopened = PackageManager::open(&path, Config::default()).unwrap();
    assert_eq!(manager.catalog(), reopened.catalog());

    let pod: Pod = manager.catalog().load_by_name("books").unwrap().unwrap();
    assert_eq!(pod.options["nested"], json!([{}]));
    assert!(!pod.options.contains_key("detail_url"));
    assert!(!pod.field("title").unwrap().options.contains_key("default_value"));
}
