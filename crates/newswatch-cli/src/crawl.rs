//! The `crawl` command: collect, save, summarize.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::bail;
use newswatch_core::{AppConfig, SourceTag};
use newswatch_sources::{CollectRequest, Collection, Collector, SourceOutcome, SourceRegistry};
use newswatch_store::{aggregate, HotRecord, RecordStore};
use serde::Serialize;

use crate::output::print_json;

/// Records echoed back in the summary.
const LATEST_RECORDS_SHOWN: usize = 10;

#[derive(Debug)]
pub(crate) struct CrawlOptions {
    pub keyword: String,
    pub sources: Vec<SourceTag>,
    pub limit: usize,
    pub with_details: bool,
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CrawlSummary {
    keyword: String,
    total_count: usize,
    inserted_count: usize,
    platform_counts: BTreeMap<String, usize>,
    latest_records: Vec<HotRecord>,
    sources: Vec<SourceOutcome>,
}

impl CrawlSummary {
    fn new(keyword: String, collection: Collection, inserted_count: usize) -> Self {
        Self {
            keyword,
            total_count: collection.records.len(),
            inserted_count,
            platform_counts: aggregate::count_by_platform(&collection.records),
            latest_records: collection
                .records
                .into_iter()
                .take(LATEST_RECORDS_SHOWN)
                .map(HotRecord::from)
                .collect(),
            sources: collection.outcomes,
        }
    }
}

/// Sources to query: the explicit list, else every active platform's type.
async fn resolve_sources(
    store: &RecordStore,
    requested: Vec<SourceTag>,
) -> anyhow::Result<Vec<SourceTag>> {
    let mut sources = if requested.is_empty() {
        store
            .active_platforms()
            .await
            .into_iter()
            .map(|p| p.source_type)
            .collect()
    } else {
        requested
    };
    sources.sort();
    sources.dedup();
    if sources.is_empty() {
        bail!("no active platforms; pass --source or add a platform first");
    }
    Ok(sources)
}

/// Collect records for one keyword and save them.
///
/// # Errors
///
/// Returns an error when no source can be resolved, the HTTP client cannot
/// be built, or the save fails. Individual source failures only shrink the
/// result.
pub(crate) async fn run_crawl(
    store: &RecordStore,
    config: &AppConfig,
    options: CrawlOptions,
) -> anyhow::Result<()> {
    let keyword = options.keyword.trim().to_string();
    if keyword.is_empty() {
        bail!("keyword must be non-empty");
    }
    let sources = resolve_sources(store, options.sources).await?;

    let registry = Arc::new(SourceRegistry::from_config(config)?);
    let collector = Collector::from_config(registry, config)
        .with_span(tracing::info_span!("collector", keyword = %keyword));
    let request = CollectRequest {
        keyword: keyword.clone(),
        sources,
        limit: options.limit,
        with_details: options.with_details,
    };
    let collection = collector.collect(&request).await;

    let inserted_count = if options.dry_run {
        tracing::info!(keyword = %keyword, "dry run, nothing saved");
        0
    } else {
        store.save_records(&collection.records).await?.inserted
    };

    let summary = CrawlSummary::new(keyword, collection, inserted_count);
    print_json(&summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn explicit_sources_are_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();
        let sources = resolve_sources(
            &store,
            vec![SourceTag::Weibo, SourceTag::Tencent, SourceTag::Weibo],
        )
        .await
        .unwrap();
        assert_eq!(sources, [SourceTag::Tencent, SourceTag::Weibo]);
    }

    #[tokio::test]
    async fn default_sources_come_from_active_platforms() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();
        store.add_platform("Weibo", SourceTag::Weibo).await.unwrap();
        let toutiao = store.add_platform("Toutiao", SourceTag::Toutiao).await.unwrap();
        store
            .update_platform_status(&toutiao.id, newswatch_core::Status::Inactive)
            .await
            .unwrap();

        let sources = resolve_sources(&store, Vec::new()).await.unwrap();
        assert_eq!(sources, [SourceTag::Weibo]);
    }

    #[tokio::test]
    async fn no_active_platforms_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();
        assert!(resolve_sources(&store, Vec::new()).await.is_err());
    }

    #[test]
    fn summary_caps_latest_records_and_scores_them() {
        let crawl = chrono::NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let records: Vec<newswatch_core::ContentRecord> = (0..12)
            .map(|i| {
                let mut r = newswatch_core::ContentRecord::new(
                    SourceTag::Tencent,
                    "ai",
                    &format!("https://x/{i}"),
                    crawl,
                );
                r.like_count = 4;
                r
            })
            .collect();
        let collection = Collection {
            records,
            outcomes: Vec::new(),
        };

        let summary = CrawlSummary::new("ai".to_string(), collection, 12);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalCount"], 12);
        assert_eq!(json["latestRecords"].as_array().unwrap().len(), LATEST_RECORDS_SHOWN);
        assert_eq!(json["latestRecords"][0]["hotScore"], 8);
        assert_eq!(json["platformCounts"]["Tencent News"], 12);
    }
}
