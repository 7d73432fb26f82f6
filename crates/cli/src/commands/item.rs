//! Item management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create an item from a draft file
//! wl-cli item save -c <category-id> -f draft.json
//!
//! # Update an item (the draft carries its id)
//! wl-cli item save -c <category-id> -f draft.json
//!
//! # Delete an item and unlist it from its category
//! wl-cli item delete <id> -n "OPC 53" --category <category-id> --yes
//! ```
//!
//! A draft file is the camelCase JSON form of an item draft, for example:
//!
//! ```json
//! { "name": "OPC 53", "price": 350, "visible": true }
//! ```

use std::path::Path;

use widelist_catalogue::{CatalogueError, CatalogueSnapshot};
use widelist_core::{CategoryId, ItemDraft, ItemId};

use super::{CliError, connect};

/// Create or update an item from a JSON draft file.
pub async fn save(category_id: &str, file: &Path) -> Result<(), CliError> {
    let draft_json = tokio::fs::read_to_string(file).await?;
    let draft: ItemDraft = serde_json::from_str(&draft_json)?;

    let (_, service) = connect()?;
    let snapshot = CatalogueSnapshot::load(service.store().as_ref()).await?;
    let Some(category) = snapshot.category_by_id(&CategoryId::new(category_id)) else {
        return Err(CatalogueError::NotFound {
            kind: "category",
            id: category_id.to_owned(),
        }
        .into());
    };

    let outcome = service.save_item(&draft, category).await;
    if !outcome.success {
        return Err(CliError::SaveRejected(outcome.message));
    }

    tracing::info!("{}", outcome.message);
    if let Some(id) = outcome.item_id {
        tracing::info!("Item id: {id}");
    }
    Ok(())
}

/// Delete an item, unlisting it from its category's cache when known.
pub async fn delete(
    id: &str,
    name: &str,
    category_id: Option<&str>,
    yes: bool,
) -> Result<(), CliError> {
    if !yes {
        return Err(CliError::ConfirmationRequired(format!(
            "This deletes item \"{name}\"."
        )));
    }

    let (_, service) = connect()?;
    let category_id = category_id.map(CategoryId::new);
    service
        .delete_item(&ItemId::new(id), name, category_id.as_ref())
        .await?;

    tracing::info!("Item \"{name}\" deleted successfully!");
    Ok(())
}
