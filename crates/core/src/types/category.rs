//! Category records and their stored representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::types::fields::{FieldError, Fields, from_field_map, non_empty, prune_fields, to_field_map};
use crate::types::id::{CategoryId, ItemId};

/// Summary entry kept on a category for each of its items.
///
/// These entries form the category's denormalized item cache. The item
/// records themselves stay authoritative; the cache exists so a category
/// can be displayed without fetching its items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    /// ID of the summarized item.
    pub id: ItemId,
    /// Item name at the time it was added.
    pub name: String,
    /// When the item was added to the category.
    pub added_at: DateTime<Utc>,
}

/// A catalogue category.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Display name; unique across categories (checked case-insensitively
    /// at creation time only).
    pub name: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Whether the category is shown to viewers. Records that never stored
    /// the flag read as visible.
    pub visible: bool,
    /// Denormalized item cache; refreshed whenever membership changes.
    pub widelisting_items: Vec<ItemSummary>,
    /// Set whenever `widelisting_items` changes.
    pub last_updated: Option<DateTime<Utc>>,
}

/// Input for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    /// Display name; leading and trailing whitespace is trimmed before the
    /// uniqueness check.
    pub name: String,
    /// Optional image URL.
    pub image: Option<String>,
    /// Initial visibility.
    pub visible: bool,
}

impl NewCategory {
    /// Create input for a visible category with no image.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
            visible: true,
        }
    }
}

/// Partial update for a category.
///
/// Fields left `None` are not written. Category names cannot be changed
/// once created; too much denormalized state references them.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// New image URL. An empty string clears the stored value.
    pub image: Option<String>,
    /// New visibility.
    pub visible: Option<bool>,
}

impl CategoryPatch {
    /// Fields to write for this patch.
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        if let Some(image) = &self.image {
            fields.insert("image".to_owned(), json!(image));
        }
        if let Some(visible) = self.visible {
            fields.insert("visible".to_owned(), json!(visible));
        }
        fields
    }

    /// Whether the patch changes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.image.is_none() && self.visible.is_none()
    }
}

/// Stored representation of a category.
///
/// Every field is optional so reads stay tolerant of older records; the
/// conversion to [`Category`] decides what is actually required.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CategoryRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    widelisting_items: Option<Vec<ItemSummary>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_updated: Option<DateTime<Utc>>,
}

impl Category {
    /// Decode a category from its stored fields.
    ///
    /// Missing `visible` reads as `true`, a missing item cache as empty,
    /// and an empty `image` as absent.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError`] if the record is malformed or has no name.
    pub fn from_fields(id: CategoryId, fields: &Fields) -> Result<Self, FieldError> {
        let record: CategoryRecord = from_field_map(fields)?;
        let name = record.name.ok_or(FieldError::Missing { name: "name" })?;
        Ok(Self {
            id,
            name,
            image: non_empty(record.image),
            visible: record.visible.unwrap_or(true),
            widelisting_items: record.widelisting_items.unwrap_or_default(),
            last_updated: record.last_updated,
        })
    }

    /// Encode the category for storage. The ID is never stored as a field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Malformed`] if serialization fails.
    pub fn to_fields(&self) -> Result<Fields, FieldError> {
        let record = CategoryRecord {
            name: Some(self.name.clone()),
            image: self.image.clone(),
            visible: Some(self.visible),
            widelisting_items: Some(self.widelisting_items.clone()),
            last_updated: self.last_updated,
        };
        let mut fields = to_field_map(&record)?;
        prune_fields(&mut fields);
        Ok(fields)
    }

    /// Fields updating only the item cache and its freshness stamp.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::Malformed`] if serialization fails.
    pub fn summary_fields(&self, last_updated: DateTime<Utc>) -> Result<Fields, FieldError> {
        let mut fields = Fields::new();
        let items = serde_json::to_value(&self.widelisting_items)
            .map_err(|e| FieldError::Malformed(e.to_string()))?;
        fields.insert("widelistingItems".to_owned(), items);
        fields.insert("lastUpdated".to_owned(), json!(last_updated));
        Ok(fields)
    }

    /// Whether the item cache lists the given item.
    #[must_use]
    pub fn lists_item(&self, id: &ItemId) -> bool {
        self.widelisting_items.iter().any(|entry| &entry.id == id)
    }
}
