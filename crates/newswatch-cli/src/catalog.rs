//! Keyword and platform management commands.

use std::path::Path;

use clap::Subcommand;
use newswatch_core::{SourceTag, Status};
use newswatch_store::{RecordStore, StoreError};

use crate::output::print_json;

#[derive(Debug, Subcommand)]
pub enum KeywordCommands {
    /// Track a new keyword
    Add {
        name: String,
        #[arg(long)]
        category: Option<String>,
    },
    /// Stop tracking a keyword
    Remove { name: String },
    /// Set a keyword active or inactive
    Status { name: String, status: Status },
    /// List keywords
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only active keywords
        #[arg(long)]
        active: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum PlatformCommands {
    /// Register a platform backed by a source
    Add {
        name: String,
        #[arg(long = "type")]
        source_type: SourceTag,
    },
    /// Remove a platform by id
    Remove { id: String },
    /// Set a platform active or inactive
    Status { id: String, status: Status },
    /// List platforms
    List {
        #[arg(long)]
        active: bool,
    },
}

pub(crate) async fn run_keywords(store: &RecordStore, command: KeywordCommands) -> anyhow::Result<()> {
    match command {
        KeywordCommands::Add { name, category } => {
            let keyword = store.add_keyword(&name, category.as_deref()).await?;
            print_json(&keyword)
        }
        KeywordCommands::Remove { name } => {
            store.delete_keyword(&name).await?;
            println!("removed keyword '{name}'");
            Ok(())
        }
        KeywordCommands::Status { name, status } => {
            let keyword = store.update_keyword_status(&name, status).await?;
            print_json(&keyword)
        }
        KeywordCommands::List { category, active } => {
            let mut keywords = match category.as_deref() {
                Some(category) => store.keywords_by_category(category).await,
                None => store.list_keywords().await,
            };
            if active {
                keywords.retain(newswatch_core::Keyword::is_active);
            }
            print_json(&keywords)
        }
    }
}

pub(crate) async fn run_platforms(
    store: &RecordStore,
    command: PlatformCommands,
) -> anyhow::Result<()> {
    match command {
        PlatformCommands::Add { name, source_type } => {
            let platform = store.add_platform(&name, source_type).await?;
            print_json(&platform)
        }
        PlatformCommands::Remove { id } => {
            store.delete_platform(&id).await?;
            println!("removed platform {id}");
            Ok(())
        }
        PlatformCommands::Status { id, status } => {
            let platform = store.update_platform_status(&id, status).await?;
            print_json(&platform)
        }
        PlatformCommands::List { active } => {
            let platforms = if active {
                store.active_platforms().await
            } else {
                store.list_platforms().await
            };
            print_json(&platforms)
        }
    }
}

/// Add every seeded keyword and platform not already present.
///
/// # Errors
///
/// Returns an error if the seed file is invalid or a store write fails.
/// Entries that already exist are skipped.
pub(crate) async fn run_seed(store: &RecordStore, seed_path: &Path) -> anyhow::Result<()> {
    let seed = newswatch_core::load_seed(seed_path)?;

    let mut added_keywords = 0usize;
    for keyword in &seed.keywords {
        match store
            .add_keyword(&keyword.name, keyword.category.as_deref())
            .await
        {
            Ok(_) => added_keywords += 1,
            Err(StoreError::Duplicate { .. }) => {
                tracing::debug!(keyword = %keyword.name, "keyword already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut added_platforms = 0usize;
    for platform in &seed.platforms {
        match store.add_platform(&platform.name, platform.source_type).await {
            Ok(_) => added_platforms += 1,
            Err(StoreError::Duplicate { .. }) => {
                tracing::debug!(platform = %platform.name, "platform already present, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        path = %seed_path.display(),
        added_keywords,
        added_platforms,
        "seed applied"
    );
    println!("seeded {added_keywords} keyword(s) and {added_platforms} platform(s)");
    Ok(())
}
