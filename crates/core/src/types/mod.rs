//! Core types for Widelist.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod draft;
pub mod fields;
pub mod id;
pub mod item;

pub use category::{Category, CategoryPatch, ItemSummary, NewCategory};
pub use draft::{ItemDraft, ValidationError};
pub use fields::{FieldError, Fields, prune_fields};
pub use id::*;
pub use item::{Item, ItemPricing, PriceTier, VariantCombination};
