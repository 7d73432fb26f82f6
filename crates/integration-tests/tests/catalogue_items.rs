//! Integration tests for item saves and deletes.
//!
//! These tests check the stored shape of item records end to end: flat
//! prices and tier tables never mix in one record, summary caches follow
//! creates and deletes, and validation failures leave the store untouched.

use rust_decimal::Decimal;
use serde_json::{Value, json};
use widelist_catalogue::store::ITEMS;
use widelist_catalogue::{CatalogueError, CatalogueSnapshot, DocumentStore};
use widelist_core::{Category, ItemDraft, ItemPricing, NewCategory};
use widelist_integration_tests::{TestContext, flat_draft};

/// Create a category to save items into.
async fn seed_category(ctx: &TestContext, name: &str) -> Category {
    ctx.service
        .create_category(NewCategory::new(name))
        .await
        .expect("Failed to create category")
}

/// A two-dimension draft with a single priced combination.
fn tiered_draft() -> ItemDraft {
    let mut draft = ItemDraft {
        name: "Wall Paint".to_owned(),
        ..ItemDraft::default()
    };
    draft.set_variant_types(2);
    draft.set_variant_name(0, "Color");
    draft.set_variant_name(1, "Size");
    draft.add_combination();
    draft.set_value(0, 0, "Red");
    draft.set_value(0, 1, "L");
    draft.add_tier(0);
    let tier = draft.tier_mut(0, 0).expect("Missing freshly added tier");
    tier.min = 1;
    tier.max = 10;
    tier.price = Decimal::from(100);
    draft
}

// ============================================================================
// Flat Pricing Tests
// ============================================================================

#[tokio::test]
async fn test_flat_save_writes_record_and_summary() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Cement").await;

    let outcome = ctx
        .service
        .save_item(&flat_draft("OPC 53", 350), &category)
        .await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Item added successfully!");
    let item_id = outcome.item_id.expect("Missing item id");

    let document = ctx
        .store
        .get(ITEMS, item_id.as_str())
        .await
        .expect("Failed to fetch item")
        .expect("Item record missing");
    assert_eq!(document.fields.get("variantTypes"), Some(&json!(0)));
    assert_eq!(
        document.fields.get("price").and_then(Value::as_f64),
        Some(350.0)
    );
    assert!(!document.fields.contains_key("variants"));
    assert!(!document.fields.contains_key("variant1Name"));
    assert_eq!(document.fields.get("categoryName"), Some(&json!("Cement")));
    assert!(document.fields.contains_key("createdAt"));

    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let stored = snapshot
        .category_by_id(&category.id)
        .expect("Category missing from snapshot");
    assert_eq!(stored.widelisting_items.len(), 1);
    let entry = stored.widelisting_items.first().expect("Missing cache entry");
    assert_eq!(entry.id, item_id);
    assert_eq!(entry.name, "OPC 53");
    assert!(stored.last_updated.is_some());
}

// ============================================================================
// Tier Pricing Tests
// ============================================================================

#[tokio::test]
async fn test_tiered_save_writes_tier_table_without_price() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;

    let outcome = ctx.service.save_item(&tiered_draft(), &category).await;
    assert!(outcome.success);
    let item_id = outcome.item_id.expect("Missing item id");

    let document = ctx
        .store
        .get(ITEMS, item_id.as_str())
        .await
        .expect("Failed to fetch item")
        .expect("Item record missing");
    assert!(!document.fields.contains_key("price"));
    assert_eq!(document.fields.get("variantTypes"), Some(&json!(2)));
    assert_eq!(document.fields.get("variant1Name"), Some(&json!("Color")));
    assert_eq!(document.fields.get("variant2Name"), Some(&json!("Size")));
    assert!(!document.fields.contains_key("variant3Name"));

    let tier = document
        .fields
        .get("variants")
        .and_then(|variants| variants.get(0))
        .and_then(|combination| combination.get("priceTiers"))
        .and_then(|tiers| tiers.get(0))
        .expect("Missing first price tier");
    assert_eq!(tier.get("min"), Some(&json!(1)));
    assert_eq!(tier.get("max"), Some(&json!(10)));
    assert_eq!(tier.get("price").and_then(Value::as_f64), Some(100.0));
    assert_eq!(tier.get("deliveryFee").and_then(Value::as_f64), Some(0.0));
}

#[tokio::test]
async fn test_save_rejects_missing_variant_names_before_any_write() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;

    let mut draft = flat_draft("Wall Paint", 10);
    draft.set_variant_types(2);
    draft.set_variant_name(0, "Color");

    let outcome = ctx.service.save_item(&draft, &category).await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Please enter names for: Variant 2");
    assert!(ctx.store.is_empty(ITEMS).await);

    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let stored = snapshot
        .category_by_id(&category.id)
        .expect("Category missing from snapshot");
    assert!(stored.widelisting_items.is_empty());
}

// ============================================================================
// Update Tests
// ============================================================================

#[tokio::test]
async fn test_update_edits_record_in_place() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;
    let created = ctx
        .service
        .save_item(&flat_draft("Primer", 350), &category)
        .await;

    let mut draft = flat_draft("Premium Primer", 380);
    draft.id.clone_from(&created.item_id);
    let outcome = ctx.service.save_item(&draft, &category).await;
    assert!(outcome.success);
    assert_eq!(outcome.message, "Changes saved successfully!");

    assert_eq!(ctx.store.len(ITEMS).await, 1);
    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let item = snapshot.items.first().expect("Item missing from snapshot");
    assert_eq!(item.name, "Premium Primer");
    assert_eq!(
        item.pricing,
        ItemPricing::Flat {
            price: Decimal::from(380)
        }
    );

    // Updates leave the summary cache alone; the entry keeps the name the
    // item was created under until a rebuild.
    let stored = snapshot
        .category_by_id(&category.id)
        .expect("Category missing from snapshot");
    let entry = stored.widelisting_items.first().expect("Missing cache entry");
    assert_eq!(entry.name, "Primer");
}

#[tokio::test]
async fn test_update_clears_retired_pricing_shape() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;
    let created = ctx
        .service
        .save_item(&flat_draft("Primer", 350), &category)
        .await;
    let item_id = created.item_id.expect("Missing item id");

    // Flat to tiered: the stored flat price must not survive.
    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let mut draft =
        ItemDraft::from_item(snapshot.item_by_id(&item_id).expect("Item missing from snapshot"));
    draft.set_variant_types(1);
    draft.set_variant_name(0, "Finish");
    draft.add_combination();
    draft.set_value(0, 0, "Matte");
    assert!(ctx.service.save_item(&draft, &category).await.success);

    let document = ctx
        .store
        .get(ITEMS, item_id.as_str())
        .await
        .expect("Failed to fetch item")
        .expect("Item record missing");
    assert!(!document.fields.contains_key("price"));
    assert_eq!(document.fields.get("variantTypes"), Some(&json!(1)));
    assert!(document.fields.contains_key("variants"));

    // Tiered back to flat: the tier fields must not survive.
    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let mut draft =
        ItemDraft::from_item(snapshot.item_by_id(&item_id).expect("Item missing from snapshot"));
    draft.set_variant_types(0);
    draft.price = Some(Decimal::from(360));
    assert!(ctx.service.save_item(&draft, &category).await.success);

    let document = ctx
        .store
        .get(ITEMS, item_id.as_str())
        .await
        .expect("Failed to fetch item")
        .expect("Item record missing");
    assert!(!document.fields.contains_key("variants"));
    assert!(!document.fields.contains_key("variant1Name"));
    assert_eq!(document.fields.get("variantTypes"), Some(&json!(0)));
    assert_eq!(
        document.fields.get("price").and_then(Value::as_f64),
        Some(360.0)
    );
}

// ============================================================================
// Delete Tests
// ============================================================================

#[tokio::test]
async fn test_delete_item_unlists_summary_entry() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;
    let first = ctx
        .service
        .save_item(&flat_draft("Primer", 350), &category)
        .await
        .item_id
        .expect("Missing item id");
    let second = ctx
        .service
        .save_item(&flat_draft("Thinner", 120), &category)
        .await
        .item_id
        .expect("Missing item id");

    ctx.service
        .delete_item(&first, "Primer", Some(&category.id))
        .await
        .expect("Failed to delete item");

    assert_eq!(ctx.store.len(ITEMS).await, 1);
    let snapshot = CatalogueSnapshot::load(&ctx.store)
        .await
        .expect("Failed to load snapshot");
    let stored = snapshot
        .category_by_id(&category.id)
        .expect("Category missing from snapshot");
    assert_eq!(stored.widelisting_items.len(), 1);
    let entry = stored.widelisting_items.first().expect("Missing cache entry");
    assert_eq!(entry.id, second);
}

#[tokio::test]
async fn test_delete_item_twice_reports_not_found() {
    let ctx = TestContext::new();
    let category = seed_category(&ctx, "Paint").await;
    let item_id = ctx
        .service
        .save_item(&flat_draft("Primer", 350), &category)
        .await
        .item_id
        .expect("Missing item id");

    ctx.service
        .delete_item(&item_id, "Primer", Some(&category.id))
        .await
        .expect("Failed to delete item");
    let err = ctx
        .service
        .delete_item(&item_id, "Primer", Some(&category.id))
        .await
        .expect_err("Second delete should fail");
    assert!(matches!(err, CatalogueError::NotFound { kind: "item", .. }));
    assert!(ctx.store.is_empty(ITEMS).await);
}
