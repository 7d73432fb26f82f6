//! Document store abstraction.
//!
//! The catalogue engine talks to its persistence backend through the
//! [`DocumentStore`] trait: a small schemaless document API with three named
//! collections. Two implementations ship with this crate:
//!
//! - [`HttpStore`] speaks to the hosted document-store service over HTTPS.
//! - [`MemoryStore`] keeps everything in process memory and backs the
//!   integration tests.
//!
//! Documents are bags of JSON fields keyed by a string id. The store does not
//! validate shapes; [`widelist_core`] owns the typed view of each collection.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use thiserror::Error;
use widelist_core::Fields;

/// Collection holding one document per category.
pub const CATEGORIES: &str = "categories";

/// Collection holding one document per catalogue item.
pub const ITEMS: &str = "widelisting";

/// Collection holding admin material such as the passcode hash.
pub const ADMIN: &str = "admin";

/// A stored document: a backend-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self { id: id.into(), fields }
    }
}

/// Errors surfaced by document store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    /// The backend could not be reached.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("store request failed with status {status}: {message}")]
    Backend { status: u16, message: String },

    /// The backend returned a payload this client could not interpret.
    #[error("invalid store response: {0}")]
    Invalid(String),
}

impl StoreError {
    pub(crate) fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_owned(),
            id: id.to_owned(),
        }
    }
}

/// Backend-agnostic document operations.
///
/// Write semantics shared by all implementations:
///
/// - `create` assigns a fresh id and stores the fields as given.
/// - `update` merges the given fields into an existing document. A field set
///   to JSON `null` is removed from the document rather than stored. Updating
///   a missing document is an error.
/// - `upsert` writes a document under a caller-chosen id, replacing whatever
///   was there.
/// - `delete` removes a document; deleting a missing document is an error.
/// - `query` returns the documents whose `field` equals the given string
///   value, in unspecified order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Fetches one document, or `None` if it does not exist.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Creates a document and returns its assigned id.
    async fn create(&self, collection: &str, fields: Fields) -> Result<String, StoreError>;

    /// Merges fields into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Writes a document under a fixed id, creating or replacing it.
    async fn upsert(&self, collection: &str, id: &str, fields: Fields) -> Result<(), StoreError>;

    /// Removes a document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Finds documents whose `field` holds exactly `value`.
    async fn query(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError>;
}
