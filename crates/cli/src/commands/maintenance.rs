//! Catalogue maintenance commands.
//!
//! # Usage
//!
//! ```bash
//! # Show catalogue counts
//! wl-cli stats
//!
//! # Rebuild drifted category summary caches
//! wl-cli repair
//! ```

use widelist_catalogue::CatalogueSnapshot;

use super::{CliError, connect};

/// Show catalogue counts.
pub async fn stats() -> Result<(), CliError> {
    let (_, service) = connect()?;
    let snapshot = CatalogueSnapshot::load(service.store().as_ref()).await?;
    let stats = snapshot.stats();

    tracing::info!(
        "Categories: {} total, {} visible",
        stats.total_categories,
        stats.visible_categories
    );
    tracing::info!(
        "Items: {} total, {} visible",
        stats.total_items,
        stats.visible_items
    );
    Ok(())
}

/// Recompute every category's summary cache from the item records.
pub async fn repair() -> Result<(), CliError> {
    let (_, service) = connect()?;
    let report = service.rebuild_summaries().await?;

    tracing::info!(
        "Checked {} categories, repaired {}",
        report.categories_checked,
        report.categories_repaired
    );
    Ok(())
}
