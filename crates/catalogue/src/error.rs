//! Unified error handling for the catalogue engine.

use thiserror::Error;
use widelist_core::{FieldError, ValidationError};

use crate::store::StoreError;

/// Application-level error type for catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// Input failed a validation rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A category with the same name already exists.
    #[error("Category \"{0}\" already exists")]
    DuplicateName(String),

    /// The addressed record does not exist.
    #[error("Not found: {kind} {id}")]
    NotFound { kind: &'static str, id: String },

    /// A stored document could not be read back into its typed form.
    #[error("Corrupt record: {0}")]
    Corrupt(#[from] FieldError),

    /// The document store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A category delete removed some items, then failed partway.
    #[error("Category delete failed after removing {items_removed} items: {source}")]
    PartialCascade {
        items_removed: usize,
        source: StoreError,
    },
}

impl CatalogueError {
    pub(crate) fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }
}

impl From<ValidationError> for CatalogueError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_error_display() {
        let err = CatalogueError::DuplicateName("Cement".to_string());
        assert_eq!(err.to_string(), "Category \"Cement\" already exists");

        let err = CatalogueError::not_found("category", "abc");
        assert_eq!(err.to_string(), "Not found: category abc");
    }

    #[test]
    fn test_validation_error_carries_user_message() {
        let err = CatalogueError::from(ValidationError::MissingPrice);
        assert_eq!(err.to_string(), "Validation error: Please enter price!");
    }
}
