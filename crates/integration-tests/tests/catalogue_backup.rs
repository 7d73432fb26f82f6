//! Integration tests for backup export.
//!
//! A backup is the raw contents of both collections with ids embedded,
//! wrapped in an envelope naming when, who, and which format version. It
//! must capture even records the typed model refuses to load.

use serde_json::{Value, json};
use widelist_catalogue::store::CATEGORIES;
use widelist_catalogue::{CatalogueBackup, CatalogueSnapshot, DocumentStore};
use widelist_core::NewCategory;
use widelist_integration_tests::{TestContext, fields, flat_draft};

#[tokio::test]
async fn test_export_covers_both_collections() {
    let ctx = TestContext::new();
    let category = ctx
        .service
        .create_category(NewCategory::new("Cement"))
        .await
        .expect("Failed to create category");
    let item_id = ctx
        .service
        .save_item(&flat_draft("OPC 53", 350), &category)
        .await
        .item_id
        .expect("Missing item id");

    let backup = CatalogueBackup::export(&ctx.store, "Widelist Catalogue Admin")
        .await
        .expect("Failed to export backup");
    assert_eq!(backup.record_count(), 2);

    let parsed: Value = serde_json::from_str(
        &backup.to_json_pretty().expect("Failed to serialize backup"),
    )
    .expect("Backup JSON should parse");
    assert_eq!(parsed.get("version"), Some(&json!("1.0")));
    assert_eq!(
        parsed.get("exportedBy"),
        Some(&json!("Widelist Catalogue Admin"))
    );
    assert!(parsed.get("timestamp").is_some());

    let categories = parsed
        .get("categories")
        .and_then(Value::as_array)
        .expect("Missing categories array");
    assert_eq!(categories.len(), 1);
    let exported = categories.first().expect("Missing exported category");
    assert_eq!(exported.get("id"), Some(&json!(category.id.as_str())));
    assert_eq!(exported.get("name"), Some(&json!("Cement")));

    let widelisting = parsed
        .get("widelisting")
        .and_then(Value::as_array)
        .expect("Missing widelisting array");
    assert_eq!(widelisting.len(), 1);
    let exported = widelisting.first().expect("Missing exported item");
    assert_eq!(exported.get("id"), Some(&json!(item_id.as_str())));
}

#[tokio::test]
async fn test_export_file_name_shape() {
    let ctx = TestContext::new();
    let backup = CatalogueBackup::export(&ctx.store, "tester")
        .await
        .expect("Failed to export backup");

    let name = backup.file_name();
    let stamp = name
        .strip_prefix("widelist-backup-")
        .and_then(|rest| rest.strip_suffix(".json"))
        .expect("Unexpected backup file name");
    assert_eq!(stamp.len(), 19);
    assert!(!stamp.contains(':'));
    assert!(!stamp.contains('.'));
}

#[tokio::test]
async fn test_export_includes_records_the_snapshot_skips() {
    let ctx = TestContext::new();
    ctx.store
        .create(CATEGORIES, fields(json!({ "visible": true })))
        .await
        .expect("Failed to seed nameless category");
    ctx.store
        .create(CATEGORIES, fields(json!({ "name": "Cement" })))
        .await
        .expect("Failed to seed category");

    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    assert_eq!(snapshot.categories.len(), 1);

    let backup = CatalogueBackup::export(&ctx.store, "tester")
        .await
        .expect("Failed to export backup");
    assert_eq!(backup.record_count(), 2);
}
