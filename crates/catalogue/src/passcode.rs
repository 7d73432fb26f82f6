//! Admin passcode gate.
//!
//! The catalogue is protected by a single shared passcode. Its SHA-256 hex
//! digest lives in the `admin/passcode` document; verification hashes the
//! candidate and compares digests, so the passcode itself is never stored.
//! There is no lockout, rate limiting, or session expiry.

use std::sync::Arc;

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use tracing::info;
use widelist_core::Fields;

use crate::store::{ADMIN, DocumentStore, StoreError};

/// Document holding the passcode hash.
const PASSCODE_DOC: &str = "passcode";

/// Hex-encoded SHA-256 digest of a passcode.
#[must_use]
pub fn hash_passcode(passcode: &str) -> String {
    hex::encode(Sha256::digest(passcode.as_bytes()))
}

/// Passcode verification and rollout against the document store.
#[derive(Clone)]
pub struct PasscodeGate {
    store: Arc<dyn DocumentStore>,
}

impl PasscodeGate {
    /// Create a gate over a document store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Check a candidate passcode against the stored hash.
    ///
    /// A missing hash document, or one without a usable `hash` field,
    /// verifies as `false`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the hash document cannot be fetched.
    pub async fn verify(&self, candidate: &str) -> Result<bool, StoreError> {
        let Some(document) = self.store.get(ADMIN, PASSCODE_DOC).await? else {
            return Ok(false);
        };
        let Some(stored) = document.fields.get("hash").and_then(Value::as_str) else {
            return Ok(false);
        };
        Ok(hash_passcode(candidate) == stored)
    }

    /// Store the hash of a new passcode, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the hash document cannot be written.
    pub async fn set(&self, passcode: &str) -> Result<(), StoreError> {
        let mut fields = Fields::new();
        fields.insert("hash".to_owned(), json!(hash_passcode(passcode)));
        self.store.upsert(ADMIN, PASSCODE_DOC, fields).await?;
        info!("Admin passcode hash set");
        Ok(())
    }
}

impl std::fmt::Debug for PasscodeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasscodeGate").finish_non_exhaustive()
    }
}
