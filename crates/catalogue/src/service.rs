//! Catalogue consistency engine.
//!
//! `CatalogueService` owns every mutation of the catalogue collections and
//! the rules that keep them consistent:
//! 1. Category names are unique (checked case-insensitively at creation)
//! 2. Creating an item appends a summary entry to its category's cache
//! 3. Deleting a category cascades over its items first
//! 4. An item stores exactly one pricing shape at a time
//!
//! Multi-step mutations run sequentially without transactions. A failure
//! partway leaves the completed steps in place; [`PartialCascade`] reports
//! how far a cascade got, and [`rebuild_summaries`] is the recovery path
//! for drifted summary caches.
//!
//! [`PartialCascade`]: CatalogueError::PartialCascade
//! [`rebuild_summaries`]: CatalogueService::rebuild_summaries

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};
use widelist_core::{
    Category, CategoryId, CategoryPatch, ItemDraft, ItemId, ItemSummary, NewCategory,
};

use crate::error::CatalogueError;
use crate::snapshot::CatalogueSnapshot;
use crate::store::{CATEGORIES, Document, DocumentStore, ITEMS, StoreError};

/// Messages shown to the person editing, word for word.
const MSG_ITEM_ADDED: &str = "Item added successfully!";
const MSG_CHANGES_SAVED: &str = "Changes saved successfully!";
const MSG_ADD_FAILED: &str = "Failed to add item. Please try again.";
const MSG_UPDATE_FAILED: &str = "Failed to update item. Please try again.";
const MSG_CATEGORY_ID_MISSING: &str =
    "Category ID is missing. Please refresh the page and try again.";
const MSG_CATEGORY_NAME_REQUIRED: &str = "Category name is required";

/// Result of saving an item draft.
///
/// Save never returns an error; validation and store failures both land
/// here as a displayable message, so a caller can always branch on
/// `success` without exception plumbing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Whether the save went through.
    pub success: bool,
    /// Message to show the person editing.
    pub message: String,
    /// ID of the saved item, when the save went through.
    pub item_id: Option<ItemId>,
}

impl SaveOutcome {
    fn created(item_id: ItemId) -> Self {
        Self {
            success: true,
            message: MSG_ITEM_ADDED.to_owned(),
            item_id: Some(item_id),
        }
    }

    fn updated(item_id: ItemId) -> Self {
        Self {
            success: true,
            message: MSG_CHANGES_SAVED.to_owned(),
            item_id: Some(item_id),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            item_id: None,
        }
    }
}

/// Result of a cascading category delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeReport {
    /// Items removed before the category record itself.
    pub items_removed: usize,
}

/// Result of a summary cache rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RebuildReport {
    /// Categories whose cache was compared against the item records.
    pub categories_checked: usize,
    /// Categories whose cache had drifted and was rewritten.
    pub categories_repaired: usize,
}

/// Catalogue mutation service.
pub struct CatalogueService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogueService {
    /// Create a new catalogue service over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// The underlying document store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Create a category.
    ///
    /// The name is trimmed, then checked against every existing category
    /// name case-insensitively before anything is written.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Validation`] for a blank name,
    /// [`CatalogueError::DuplicateName`] when the name is taken, or a store
    /// error.
    #[instrument(skip(self, category), fields(name = %category.name))]
    pub async fn create_category(
        &self,
        category: NewCategory,
    ) -> Result<Category, CatalogueError> {
        let name = category.name.trim();
        if name.is_empty() {
            return Err(CatalogueError::Validation(
                MSG_CATEGORY_NAME_REQUIRED.to_owned(),
            ));
        }

        let lowered = name.to_lowercase();
        for document in self.store.list(CATEGORIES).await? {
            let taken = document
                .fields
                .get("name")
                .and_then(Value::as_str)
                .is_some_and(|existing| existing.trim().to_lowercase() == lowered);
            if taken {
                return Err(CatalogueError::DuplicateName(name.to_owned()));
            }
        }

        let record = Category {
            id: CategoryId::new(""),
            name: name.to_owned(),
            image: category.image.filter(|image| !image.is_empty()),
            visible: category.visible,
            widelisting_items: Vec::new(),
            last_updated: None,
        };
        let fields = record.to_fields()?;
        let id = self.store.create(CATEGORIES, fields).await?;
        info!(category_id = %id, "Created category");

        Ok(Category {
            id: CategoryId::new(id),
            ..record
        })
    }

    /// Apply a partial update to a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::NotFound`] for a stale id, or a store
    /// error.
    #[instrument(skip(self, patch), fields(category_id = %id))]
    pub async fn edit_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> Result<(), CatalogueError> {
        if patch.is_empty() {
            return Ok(());
        }
        self.store
            .update(CATEGORIES, id.as_str(), patch.to_fields())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CatalogueError::not_found("category", id.as_str()),
                other => CatalogueError::Store(other),
            })?;
        info!("Updated category");
        Ok(())
    }

    /// Delete a category and every item that belongs to it.
    ///
    /// Items are matched by their stored category link and, for records
    /// that predate the link, by category name; the two result sets are
    /// unioned. Items are deleted one by one, then the category record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::NotFound`] if the category does not exist
    /// (nothing is deleted), or [`CatalogueError::PartialCascade`] if a
    /// delete fails partway. Completed deletes are not undone; re-running
    /// the operation finishes the job.
    #[instrument(skip(self), fields(category_id = %id, name))]
    pub async fn delete_category(
        &self,
        id: &CategoryId,
        name: &str,
    ) -> Result<CascadeReport, CatalogueError> {
        if self.store.get(CATEGORIES, id.as_str()).await?.is_none() {
            return Err(CatalogueError::not_found("category", id.as_str()));
        }

        let mut members: Vec<Document> = self.store.query(ITEMS, "categoryId", id.as_str()).await?;
        for document in self.store.query(ITEMS, "categoryName", name).await? {
            if !members.iter().any(|member| member.id == document.id) {
                members.push(document);
            }
        }

        let mut items_removed = 0;
        for document in &members {
            if let Err(source) = self.store.delete(ITEMS, &document.id).await {
                error!(error = %source, items_removed, "Category delete stopped partway");
                return Err(CatalogueError::PartialCascade {
                    items_removed,
                    source,
                });
            }
            items_removed += 1;
        }

        if let Err(source) = self.store.delete(CATEGORIES, id.as_str()).await {
            error!(error = %source, items_removed, "Items deleted but category record remains");
            return Err(CatalogueError::PartialCascade {
                items_removed,
                source,
            });
        }

        info!(items_removed, "Deleted category with its items");
        Ok(CascadeReport { items_removed })
    }

    /// Save an item draft into `category`.
    ///
    /// A draft with a non-blank id updates that record in place without
    /// touching the category's summary cache. A draft without one creates
    /// a new record, then appends a summary entry to the cache.
    #[instrument(skip(self, draft, category), fields(item = %draft.name))]
    pub async fn save_item(&self, draft: &ItemDraft, category: &Category) -> SaveOutcome {
        if let Err(e) = draft.validate() {
            return SaveOutcome::failure(e.to_string());
        }

        let existing = draft
            .id
            .as_ref()
            .filter(|id| !id.as_str().trim().is_empty());

        if let Some(id) = existing {
            match self.update_item(id, draft).await {
                Ok(()) => SaveOutcome::updated(id.clone()),
                Err(e) => {
                    error!(error = %e, "Failed to update item");
                    SaveOutcome::failure(MSG_UPDATE_FAILED)
                }
            }
        } else {
            match self.create_item(draft, category).await {
                Ok(id) => SaveOutcome::created(id),
                Err(CatalogueError::Validation(message)) => SaveOutcome::failure(message),
                Err(e) => {
                    error!(error = %e, "Failed to create item");
                    SaveOutcome::failure(MSG_ADD_FAILED)
                }
            }
        }
    }

    async fn update_item(&self, id: &ItemId, draft: &ItemDraft) -> Result<(), CatalogueError> {
        let mut fields = draft.update_fields()?;
        fields.insert("updatedAt".to_owned(), json!(Utc::now()));
        self.store.update(ITEMS, id.as_str(), fields).await?;
        info!(item_id = %id, "Updated item");
        Ok(())
    }

    async fn create_item(
        &self,
        draft: &ItemDraft,
        category: &Category,
    ) -> Result<ItemId, CatalogueError> {
        if category.id.as_str().trim().is_empty() {
            return Err(CatalogueError::Validation(
                MSG_CATEGORY_ID_MISSING.to_owned(),
            ));
        }

        let now = Utc::now();
        let mut fields = draft.create_fields()?;
        fields.insert("createdAt".to_owned(), json!(now));
        fields.insert("updatedAt".to_owned(), json!(now));
        fields.insert("categoryId".to_owned(), json!(category.id));
        fields.insert("categoryName".to_owned(), json!(category.name));

        let id = ItemId::new(self.store.create(ITEMS, fields).await?);
        info!(item_id = %id, "Created item");

        let mut listed = category.clone();
        listed.widelisting_items.push(ItemSummary {
            id: id.clone(),
            name: draft.name.clone(),
            added_at: now,
        });
        let summary = listed.summary_fields(now)?;
        self.store
            .update(CATEGORIES, category.id.as_str(), summary)
            .await?;

        Ok(id)
    }

    /// Delete an item and unlist it from its category's summary cache.
    ///
    /// The cache refresh is best-effort: if the category cannot be read or
    /// written the item stays deleted and the stale cache entry is left for
    /// [`rebuild_summaries`](Self::rebuild_summaries) to clean up.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::NotFound`] if the item does not exist, or
    /// a store error from the delete itself.
    #[instrument(skip(self), fields(item_id = %id, name))]
    pub async fn delete_item(
        &self,
        id: &ItemId,
        name: &str,
        category_id: Option<&CategoryId>,
    ) -> Result<(), CatalogueError> {
        self.store
            .delete(ITEMS, id.as_str())
            .await
            .map_err(|e| match e {
                StoreError::NotFound { .. } => CatalogueError::not_found("item", id.as_str()),
                other => CatalogueError::Store(other),
            })?;
        info!("Deleted item");

        if let Some(category_id) = category_id {
            if let Err(e) = self.unlist_item(category_id, id).await {
                warn!(
                    error = %e,
                    category_id = %category_id,
                    "Item deleted but its summary cache entry remains"
                );
            }
        }
        Ok(())
    }

    async fn unlist_item(
        &self,
        category_id: &CategoryId,
        item_id: &ItemId,
    ) -> Result<(), CatalogueError> {
        let document = self
            .store
            .get(CATEGORIES, category_id.as_str())
            .await?
            .ok_or_else(|| CatalogueError::not_found("category", category_id.as_str()))?;
        let mut category = Category::from_fields(category_id.clone(), &document.fields)?;

        if !category.lists_item(item_id) {
            return Ok(());
        }
        category.widelisting_items.retain(|entry| &entry.id != item_id);
        let fields = category.summary_fields(Utc::now())?;
        self.store
            .update(CATEGORIES, category_id.as_str(), fields)
            .await?;
        Ok(())
    }

    /// Recompute every category's summary cache from the item records.
    ///
    /// Membership comes from the items themselves; `addedAt` stamps are
    /// kept for entries that were already listed and taken from the item's
    /// `createdAt` otherwise. Only categories whose cache actually drifted
    /// are written.
    ///
    /// # Errors
    ///
    /// Returns a store error if a collection cannot be listed or a repair
    /// cannot be written.
    #[instrument(skip(self))]
    pub async fn rebuild_summaries(&self) -> Result<RebuildReport, CatalogueError> {
        let snapshot = CatalogueSnapshot::load(self.store.as_ref()).await?;
        let mut report = RebuildReport::default();

        for category in &snapshot.categories {
            report.categories_checked += 1;

            let mut expected: Vec<ItemSummary> = snapshot
                .items
                .iter()
                .filter(|item| item.belongs_to(&category.id, &category.name))
                .map(|item| ItemSummary {
                    id: item.id.clone(),
                    name: item.name.clone(),
                    added_at: category
                        .widelisting_items
                        .iter()
                        .find(|entry| entry.id == item.id)
                        .map_or(item.created_at, |entry| entry.added_at),
                })
                .collect();
            expected.sort_by(|a, b| {
                a.added_at
                    .cmp(&b.added_at)
                    .then_with(|| a.id.as_str().cmp(b.id.as_str()))
            });

            if drifted(&expected, &category.widelisting_items) {
                let mut repaired = category.clone();
                repaired.widelisting_items = expected;
                let fields = repaired.summary_fields(Utc::now())?;
                self.store
                    .update(CATEGORIES, category.id.as_str(), fields)
                    .await?;
                report.categories_repaired += 1;
                info!(category = %category.name, "Repaired summary cache");
            }
        }

        Ok(report)
    }
}

impl std::fmt::Debug for CatalogueService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogueService").finish_non_exhaustive()
    }
}

/// Whether two summary caches hold different entries, ignoring order.
fn drifted(expected: &[ItemSummary], current: &[ItemSummary]) -> bool {
    if expected.len() != current.len() {
        return true;
    }
    let mut expected: Vec<&ItemSummary> = expected.iter().collect();
    expected.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    let mut current: Vec<&ItemSummary> = current.iter().collect();
    current.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    expected != current
}
