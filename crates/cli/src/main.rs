//! Widelist CLI - Catalogue management and backup tools.
//!
//! # Usage
//!
//! ```bash
//! # Create a category
//! wl-cli category create -n "Cement"
//!
//! # List the catalogue
//! wl-cli category list
//!
//! # Save an item from a draft file
//! wl-cli item save -c <category-id> -f draft.json
//!
//! # Delete a category and everything in it
//! wl-cli category delete <id> -n "Cement" --yes
//!
//! # Export a backup
//! wl-cli export --out ./backups
//! ```
//!
//! # Commands
//!
//! - `category` - Create, edit, delete, and list categories
//! - `item` - Save and delete items
//! - `stats` - Show catalogue counts
//! - `export` - Write a JSON backup of both collections
//! - `passcode` - Set or verify the admin passcode
//! - `repair` - Rebuild drifted category summary caches

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "wl-cli")]
#[command(author, version, about = "Widelist catalogue CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Show catalogue counts
    Stats,
    /// Write a JSON backup of both collections
    Export {
        /// Directory to write the backup into (default: configured backup dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Manage the admin passcode
    Passcode {
        #[command(subcommand)]
        action: PasscodeAction,
    },
    /// Rebuild drifted category summary caches
    Repair,
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create a new category
    Create {
        /// Category name (must be unique, case-insensitive)
        #[arg(short, long)]
        name: String,

        /// Image URL
        #[arg(long)]
        image: Option<String>,

        /// Create the category hidden from viewers
        #[arg(long)]
        hidden: bool,
    },
    /// Edit a category's image or visibility
    Edit {
        /// Category ID
        id: String,

        /// New image URL (empty string clears it)
        #[arg(long)]
        image: Option<String>,

        /// New visibility
        #[arg(long)]
        visible: Option<bool>,
    },
    /// Delete a category and every item in it
    Delete {
        /// Category ID
        id: String,

        /// Category name (items are matched by it as well)
        #[arg(short, long)]
        name: String,

        /// Confirm the cascading delete
        #[arg(long)]
        yes: bool,
    },
    /// List every category with its items
    List,
}

#[derive(Subcommand)]
enum ItemAction {
    /// Create or update an item from a JSON draft file
    Save {
        /// ID of the category the item belongs to
        #[arg(short, long)]
        category: String,

        /// Path to the draft JSON file
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete an item
    Delete {
        /// Item ID
        id: String,

        /// Item name (for the confirmation message)
        #[arg(short, long)]
        name: String,

        /// ID of the owning category, to unlist the item from its cache
        #[arg(long)]
        category: Option<String>,

        /// Confirm the delete
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PasscodeAction {
    /// Hash a passcode and store it
    Set {
        /// The new passcode
        passcode: String,
    },
    /// Check a passcode against the stored hash
    Verify {
        /// The passcode to check
        passcode: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Category { action } => match action {
            CategoryAction::Create {
                name,
                image,
                hidden,
            } => commands::category::create(&name, image, hidden).await?,
            CategoryAction::Edit { id, image, visible } => {
                commands::category::edit(&id, image, visible).await?;
            }
            CategoryAction::Delete { id, name, yes } => {
                commands::category::delete(&id, &name, yes).await?;
            }
            CategoryAction::List => commands::category::list().await?,
        },
        Commands::Item { action } => match action {
            ItemAction::Save { category, file } => {
                commands::item::save(&category, &file).await?;
            }
            ItemAction::Delete {
                id,
                name,
                category,
                yes,
            } => commands::item::delete(&id, &name, category.as_deref(), yes).await?,
        },
        Commands::Stats => commands::maintenance::stats().await?,
        Commands::Export { out } => commands::backup::export(out).await?,
        Commands::Passcode { action } => match action {
            PasscodeAction::Set { passcode } => commands::passcode::set(&passcode).await?,
            PasscodeAction::Verify { passcode } => commands::passcode::verify(&passcode).await?,
        },
        Commands::Repair => commands::maintenance::repair().await?,
    }
    Ok(())
}
