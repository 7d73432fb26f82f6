//! Read-side view of the catalogue.
//!
//! A [`CatalogueSnapshot`] is a full fetch of both collections, decoded into
//! the typed model. Callers reload after every mutation rather than patching
//! state incrementally; a fresh snapshot is the one source of truth for
//! display and lookups.
//!
//! Item-to-category membership always comes from the item records, never
//! from the categories' summary caches.

use tracing::warn;
use widelist_core::{Category, CategoryId, Item, ItemId};

use crate::store::{CATEGORIES, DocumentStore, ITEMS, StoreError};

/// Decoded contents of both catalogue collections.
#[derive(Debug, Clone, Default)]
pub struct CatalogueSnapshot {
    /// Every readable category, in store order.
    pub categories: Vec<Category>,
    /// Every readable item, in store order.
    pub items: Vec<Item>,
}

/// Counts shown on the analysis panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CatalogueStats {
    pub total_categories: usize,
    pub total_items: usize,
    pub visible_categories: usize,
    pub visible_items: usize,
}

impl CatalogueSnapshot {
    /// Fetch and decode both collections.
    ///
    /// Documents that fail to decode are skipped with a warning; one
    /// malformed record must not take the whole catalogue down with it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if either collection cannot be listed.
    pub async fn load(store: &dyn DocumentStore) -> Result<Self, StoreError> {
        let mut categories = Vec::new();
        for document in store.list(CATEGORIES).await? {
            match Category::from_fields(CategoryId::new(document.id.clone()), &document.fields) {
                Ok(category) => categories.push(category),
                Err(e) => {
                    warn!(collection = CATEGORIES, id = %document.id, error = %e, "Skipping unreadable document");
                }
            }
        }

        let mut items = Vec::new();
        for document in store.list(ITEMS).await? {
            match Item::from_fields(ItemId::new(document.id.clone()), &document.fields) {
                Ok(item) => items.push(item),
                Err(e) => {
                    warn!(collection = ITEMS, id = %document.id, error = %e, "Skipping unreadable document");
                }
            }
        }

        Ok(Self { categories, items })
    }

    /// Items grouped under `category_name`, the stored grouping key.
    #[must_use]
    pub fn items_in(&self, category_name: &str) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| item.category_name == category_name)
            .collect()
    }

    /// Every category paired with its items, in category order.
    #[must_use]
    pub fn grouped(&self) -> Vec<(&Category, Vec<&Item>)> {
        self.categories
            .iter()
            .map(|category| (category, self.items_in(&category.name)))
            .collect()
    }

    #[must_use]
    pub fn category_by_id(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    #[must_use]
    pub fn item_by_id(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Counts for the analysis panel.
    #[must_use]
    pub fn stats(&self) -> CatalogueStats {
        CatalogueStats {
            total_categories: self.categories.len(),
            total_items: self.items.len(),
            visible_categories: self
                .categories
                .iter()
                .filter(|category| category.visible)
                .count(),
            visible_items: self.items.iter().filter(|item| item.visible).count(),
        }
    }
}
