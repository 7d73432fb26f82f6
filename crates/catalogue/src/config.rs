//! Catalogue configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WIDELIST_STORE_URL` - Document store base URL (http or https)
//!
//! ## Optional
//! - `WIDELIST_STORE_TOKEN` - Bearer token for the document store
//! - `WIDELIST_EXPORTED_BY` - Name stamped into backups (default: Widelist Catalogue Admin)
//! - `WIDELIST_BACKUP_DIR` - Directory backups are written to (default: current directory)

use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_EXPORTED_BY: &str = "Widelist Catalogue Admin";
const DEFAULT_BACKUP_DIR: &str = ".";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Catalogue application configuration.
#[derive(Clone)]
pub struct CatalogueConfig {
    /// Document store base URL
    pub store_url: String,
    /// Bearer token for the document store (optional)
    pub store_token: Option<SecretString>,
    /// Name stamped into backups
    pub exported_by: String,
    /// Directory backups are written to
    pub backup_dir: PathBuf,
}

impl std::fmt::Debug for CatalogueConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogueConfig")
            .field("store_url", &self.store_url)
            .field(
                "store_token",
                &self.store_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("exported_by", &self.exported_by)
            .field("backup_dir", &self.backup_dir)
            .finish()
    }
}

impl CatalogueConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store_url = get_required_env("WIDELIST_STORE_URL")?;
        validate_store_url(&store_url, "WIDELIST_STORE_URL")?;
        let store_token = get_optional_env("WIDELIST_STORE_TOKEN").map(SecretString::from);
        let exported_by = get_env_or_default("WIDELIST_EXPORTED_BY", DEFAULT_EXPORTED_BY);
        let backup_dir = PathBuf::from(get_env_or_default(
            "WIDELIST_BACKUP_DIR",
            DEFAULT_BACKUP_DIR,
        ));

        Ok(Self {
            store_url,
            store_token,
            exported_by,
            backup_dir,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a store URL is usable as a request base.
fn validate_store_url(url: &str, var_name: &str) -> Result<(), ConfigError> {
    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(());
    }
    Err(ConfigError::InvalidEnvVar(
        var_name.to_string(),
        "must start with http:// or https://".to_string(),
    ))
}
