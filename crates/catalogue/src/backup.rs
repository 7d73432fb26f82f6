//! Catalogue backup export.
//!
//! A backup is a pretty-printed JSON snapshot of both collections with the
//! export moment, who exported, and a format version. Records go out raw,
//! exactly as stored and with their ids embedded, so a backup captures even
//! documents the typed model would reject. Export only; there is no restore
//! path.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::store::{CATEGORIES, Document, DocumentStore, ITEMS, StoreError};

/// Backup format version.
const VERSION: &str = "1.0";

/// A point-in-time export of the whole catalogue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueBackup {
    /// Raw category records with embedded ids.
    categories: Vec<Value>,
    /// Raw item records with embedded ids.
    widelisting: Vec<Value>,
    /// When the export was taken.
    timestamp: DateTime<Utc>,
    /// Who took the export.
    exported_by: String,
    /// Backup format version.
    version: String,
}

impl CatalogueBackup {
    /// Fetch both collections and assemble a backup stamped with the
    /// current time.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if either collection cannot be listed.
    pub async fn export(
        store: &dyn DocumentStore,
        exported_by: &str,
    ) -> Result<Self, StoreError> {
        let categories = store.list(CATEGORIES).await?;
        let widelisting = store.list(ITEMS).await?;

        Ok(Self {
            categories: categories.into_iter().map(document_value).collect(),
            widelisting: widelisting.into_iter().map(document_value).collect(),
            timestamp: Utc::now(),
            exported_by: exported_by.to_owned(),
            version: VERSION.to_owned(),
        })
    }

    /// File name for this backup, derived from its timestamp:
    /// `widelist-backup-<YYYY-MM-DDTHH-MM-SS>.json`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("widelist-backup-{}.json", file_stamp(self.timestamp))
    }

    /// Number of records in the backup, categories plus items.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.categories.len() + self.widelisting.len()
    }

    /// Serialize the backup as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error; with JSON-sourced records this does
    /// not happen in practice.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// A stored document as the export writes it: its fields plus an `id` key.
fn document_value(document: Document) -> Value {
    let mut fields = document.fields;
    fields.insert("id".to_owned(), Value::String(document.id));
    Value::Object(fields)
}

/// Timestamp in file-name form: ISO-8601 with `:` and `.` replaced by `-`,
/// truncated to whole seconds.
fn file_stamp(timestamp: DateTime<Utc>) -> String {
    let mut stamp: String = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .chars()
        .map(|c| if c == ':' || c == '.' { '-' } else { c })
        .collect();
    stamp.truncate(19);
    stamp
}
