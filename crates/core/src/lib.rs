//! Widelist Core - Shared types library.
//!
//! This crate provides common types used across all Widelist components:
//! - `catalogue` - Document-store client and catalogue consistency engine
//! - `cli` - Command-line tools for catalogue management
//!
//! # Architecture
//!
//! The core crate contains only types and conversions - no I/O, no store
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, categories, items, pricing shapes, and draft
//!   editing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
