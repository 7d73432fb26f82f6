//! Integration tests for the Widelist catalogue.
//!
//! Every test drives the full stack (typed model, consistency engine,
//! backup, passcode gate) against [`MemoryStore`], so no external document
//! store is required.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p widelist-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalogue_categories` - Category lifecycle and cascading deletes
//! - `catalogue_items` - Item saves, pricing shapes, and deletes
//! - `catalogue_maintenance` - Summary cache repair and statistics
//! - `catalogue_backup` - Backup export
//! - `catalogue_passcode` - Admin passcode gate

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;
use widelist_catalogue::{CatalogueService, MemoryStore};
use widelist_core::{Fields, ItemDraft};

/// A catalogue service over a fresh in-memory store.
///
/// The store handle shares state with the service, so tests can seed and
/// inspect raw documents around the operations they exercise.
pub struct TestContext {
    /// Service under test.
    pub service: CatalogueService,
    /// Direct handle to the backing store.
    pub store: MemoryStore,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let service = CatalogueService::new(Arc::new(store.clone()));
        Self { service, store }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// A JSON object literal as stored fields.
///
/// # Panics
///
/// Panics if `value` is not a JSON object.
#[must_use]
pub fn fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// A flat-priced item draft ready to save.
#[must_use]
pub fn flat_draft(name: &str, price: i64) -> ItemDraft {
    ItemDraft {
        name: name.to_owned(),
        price: Some(Decimal::from(price)),
        ..ItemDraft::default()
    }
}
