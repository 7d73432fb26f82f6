//! Command implementations for the Widelist CLI.

pub mod backup;
pub mod category;
pub mod item;
pub mod maintenance;
pub mod passcode;

use std::sync::Arc;

use thiserror::Error;
use widelist_catalogue::{
    CatalogueConfig, CatalogueError, CatalogueService, ConfigError, HttpStore, StoreError,
};

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// A catalogue operation failed.
    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    /// A file could not be read or written.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A destructive command ran without `--yes`.
    #[error("{0} Re-run with --yes to confirm.")]
    ConfirmationRequired(String),

    /// The item save was rejected.
    #[error("{0}")]
    SaveRejected(String),

    /// The supplied passcode did not match the stored hash.
    #[error("Incorrect passcode. Try again.")]
    IncorrectPasscode,
}

/// Load configuration and build the service for the configured store.
pub(crate) fn connect() -> Result<(CatalogueConfig, CatalogueService), CliError> {
    let config = CatalogueConfig::from_env()?;
    let store = HttpStore::new(&config.store_url, config.store_token.as_ref())?;
    Ok((config, CatalogueService::new(Arc::new(store))))
}
