//! Category management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a visible category
//! wl-cli category create -n "Cement" --image https://img.example/cement.png
//!
//! # Hide a category
//! wl-cli category edit <id> --visible false
//!
//! # Delete a category and every item in it
//! wl-cli category delete <id> -n "Cement" --yes
//! ```
//!
//! # Environment Variables
//!
//! - `WIDELIST_STORE_URL` - Document store base URL
//! - `WIDELIST_STORE_TOKEN` - Bearer token (optional)

use widelist_catalogue::CatalogueSnapshot;
use widelist_core::{CategoryId, CategoryPatch, NewCategory};

use super::{CliError, connect};

/// Create a new category.
pub async fn create(name: &str, image: Option<String>, hidden: bool) -> Result<(), CliError> {
    let (_, service) = connect()?;

    let category = service
        .create_category(NewCategory {
            name: name.to_owned(),
            image,
            visible: !hidden,
        })
        .await?;

    tracing::info!("Category created: {} ({})", category.name, category.id);
    Ok(())
}

/// Change a category's image or visibility.
pub async fn edit(id: &str, image: Option<String>, visible: Option<bool>) -> Result<(), CliError> {
    let patch = CategoryPatch { image, visible };
    if patch.is_empty() {
        tracing::warn!("Nothing to change; pass --image or --visible");
        return Ok(());
    }

    let (_, service) = connect()?;
    service.edit_category(&CategoryId::new(id), &patch).await?;

    tracing::info!("Category updated: {id}");
    Ok(())
}

/// Delete a category and cascade over its items.
pub async fn delete(id: &str, name: &str, yes: bool) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::ConfirmationRequired(format!(
            "This deletes category \"{name}\" and every item in it."
        )));
    }

    let (_, service) = connect()?;
    let report = service.delete_category(&CategoryId::new(id), name).await?;

    tracing::info!(
        "Category \"{}\" and {} items deleted successfully!",
        name,
        report.items_removed
    );
    Ok(())
}

/// List every category with its items.
pub async fn list() -> Result<(), CliError> {
    let (_, service) = connect()?;
    let snapshot = CatalogueSnapshot::load(service.store().as_ref()).await?;

    if snapshot.categories.is_empty() {
        tracing::info!("No categories yet");
        return Ok(());
    }

    for (category, items) in snapshot.grouped() {
        let visibility = if category.visible { "visible" } else { "hidden" };
        tracing::info!(
            "{} ({}) [{}] - {} items",
            category.name,
            category.id,
            visibility,
            items.len()
        );
        for item in items {
            tracing::info!("  {} ({})", item.name, item.id);
        }
    }
    Ok(())
}
