//! Widelist catalogue engine.
//!
//! This crate provides the catalogue functionality as a library: the
//! document store abstraction, the consistency rules around categories and
//! items, snapshots for display, backup export, and the admin passcode
//! gate. The `wl-cli` binary is a thin shell over it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backup;
pub mod config;
pub mod error;
pub mod passcode;
pub mod service;
pub mod snapshot;
pub mod store;

pub use backup::CatalogueBackup;
pub use config::{CatalogueConfig, ConfigError};
pub use error::CatalogueError;
pub use passcode::{PasscodeGate, hash_passcode};
pub use service::{CascadeReport, CatalogueService, RebuildReport, SaveOutcome};
pub use snapshot::{CatalogueSnapshot, CatalogueStats};
pub use store::{DocumentStore, HttpStore, MemoryStore, StoreError};
