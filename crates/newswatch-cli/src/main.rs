mod catalog;
mod crawl;
mod output;
mod report;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use newswatch_core::SourceTag;
use newswatch_store::RecordStore;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

use crate::catalog::{KeywordCommands, PlatformCommands};

#[derive(Debug, Parser)]
#[command(name = "newswatch")]
#[command(about = "Keyword news monitoring: collect, store and analyze coverage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage tracked keywords
    Keywords {
        #[command(subcommand)]
        command: KeywordCommands,
    },
    /// Manage configured platforms
    Platforms {
        #[command(subcommand)]
        command: PlatformCommands,
    },
    /// Load keywords and platforms from the seed file
    Seed,
    /// Collect records for a keyword and save them
    Crawl {
        keyword: String,
        /// Source to query (repeatable); defaults to every active platform
        #[arg(long = "source")]
        sources: Vec<SourceTag>,
        /// Maximum records per source
        #[arg(long, default_value = "10")]
        limit: usize,
        /// Follow each search hit with a detail read
        #[arg(long)]
        details: bool,
        /// Collect and print without writing to the store
        #[arg(long)]
        dry_run: bool,
    },
    /// Trend report for a keyword
    Analyze {
        keyword: String,
        /// Days covered by the daily counts
        #[arg(
            long,
            default_value = "30",
            value_parser = clap::value_parser!(u32)
                .range(1..=i64::from(newswatch_analytics::MAX_REPORT_DAYS))
        )]
        days: u32,
    },
    /// Hottest stored records
    Hot {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Dashboard totals
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = newswatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let run_span = tracing::info_span!("run", run_id = %uuid::Uuid::new_v4());
    let store = RecordStore::open(&config.data_dir)
        .map_err(|e| anyhow::anyhow!("data directory {} unusable: {e}", config.data_dir.display()))?
        .with_span(tracing::info_span!(parent: &run_span, "record_store"));
    let store = Arc::new(store);

    let run = async {
        match cli.command {
            Commands::Keywords { command } => catalog::run_keywords(&store, command).await,
            Commands::Platforms { command } => catalog::run_platforms(&store, command).await,
            Commands::Seed => catalog::run_seed(&store, &config.seed_path).await,
            Commands::Crawl {
                keyword,
                sources,
                limit,
                details,
                dry_run,
            } => {
                let options = crawl::CrawlOptions {
                    keyword,
                    sources,
                    limit,
                    with_details: details,
                    dry_run,
                };
                crawl::run_crawl(&store, &config, options).await
            }
            Commands::Analyze { keyword, days } => {
                report::run_analyze(Arc::clone(&store), &keyword, days).await
            }
            Commands::Hot { limit } => report::run_hot(&store, limit).await,
            Commands::Stats => report::run_stats(Arc::clone(&store)).await,
        }
    };
    run.instrument(run_span).await
}
