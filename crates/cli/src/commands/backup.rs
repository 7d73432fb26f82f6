//! Backup export command.
//!
//! # Usage
//!
//! ```bash
//! # Write a backup into the configured backup directory
//! wl-cli export
//!
//! # Write a backup somewhere else
//! wl-cli export --out ./backups
//! ```
//!
//! # Environment Variables
//!
//! - `WIDELIST_EXPORTED_BY` - Name stamped into the backup
//! - `WIDELIST_BACKUP_DIR` - Default output directory

use std::path::PathBuf;

use widelist_catalogue::CatalogueBackup;

use super::{CliError, connect};

/// Export both collections into a timestamped JSON file.
pub async fn export(out: Option<PathBuf>) -> Result<(), CliError> {
    let (config, service) = connect()?;

    let backup = CatalogueBackup::export(service.store().as_ref(), &config.exported_by).await?;
    let dir = out.unwrap_or(config.backup_dir);
    let path = dir.join(backup.file_name());

    tokio::fs::write(&path, backup.to_json_pretty()?).await?;

    tracing::info!(
        "Backup file \"{}\" written ({} records)",
        path.display(),
        backup.record_count()
    );
    Ok(())
}
