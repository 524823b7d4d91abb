//! Bounded concurrent fan-out over source adapters.
//!
//! One task per requested source, at most `max_concurrent` in flight, each
//! under its own timeout. A task that times out is dropped without
//! affecting its siblings. The merged output is sorted so it does not
//! depend on completion order.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use newswatch_core::{AppConfig, ContentRecord, SourceTag};
use serde::Serialize;
use tracing::Instrument;

use crate::adapters::{merge_detail, SourceAdapter};
use crate::registry::SourceRegistry;

/// What to collect.
#[derive(Debug, Clone)]
pub struct CollectRequest {
    pub keyword: String,
    pub sources: Vec<SourceTag>,
    /// Per-source result cap.
    pub limit: usize,
    /// Follow every search hit with a detail read.
    pub with_details: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    Collected,
    Empty,
    TimedOut,
    Unregistered,
}

/// How one source fared during a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceOutcome {
    pub source: SourceTag,
    pub status: OutcomeStatus,
    pub records: usize,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub records: Vec<ContentRecord>,
    /// One entry per requested source, in source-tag order.
    pub outcomes: Vec<SourceOutcome>,
}

pub struct Collector {
    registry: Arc<SourceRegistry>,
    max_concurrent: usize,
    task_timeout: Duration,
    span: tracing::Span,
}

impl Collector {
    #[must_use]
    pub fn new(registry: Arc<SourceRegistry>, max_concurrent: usize, task_timeout: Duration) -> Self {
        Self {
            registry,
            max_concurrent: max_concurrent.max(1),
            task_timeout,
            span: tracing::info_span!("collector"),
        }
    }

    #[must_use]
    pub fn from_config(registry: Arc<SourceRegistry>, config: &AppConfig) -> Self {
        Self::new(
            registry,
            config.max_concurrent_sources,
            Duration::from_secs(config.source_task_timeout_secs),
        )
    }

    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Run every requested source and merge the results.
    ///
    /// Records come back ordered by publish time (newest first, unparseable
    /// last), then source tag, then url. Duplicate source tags in the
    /// request are collected once.
    pub async fn collect(&self, request: &CollectRequest) -> Collection {
        let mut sources = request.sources.clone();
        sources.sort();
        sources.dedup();

        let keyword = request.keyword.as_str();
        let results: Vec<(SourceOutcome, Vec<ContentRecord>)> = stream::iter(sources)
            .map(|tag| self.run_source(tag, keyword, request.limit, request.with_details))
            .buffer_unordered(self.max_concurrent)
            .collect()
            .instrument(self.span.clone())
            .await;

        let mut collection = Collection::default();
        for (outcome, records) in results {
            collection.outcomes.push(outcome);
            collection.records.extend(records);
        }
        collection.outcomes.sort_by_key(|o| o.source);
        collection.records.sort_by(compare_records);

        tracing::info!(
            parent: &self.span,
            keyword,
            total = collection.records.len(),
            "collection finished"
        );
        collection
    }

    async fn run_source(
        &self,
        tag: SourceTag,
        keyword: &str,
        limit: usize,
        with_details: bool,
    ) -> (SourceOutcome, Vec<ContentRecord>) {
        let started = Instant::now();
        let outcome = |status, records| SourceOutcome {
            source: tag,
            status,
            records,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        let Some(adapter) = self.registry.get(tag) else {
            tracing::warn!(source = %tag, "no adapter registered for source");
            return (outcome(OutcomeStatus::Unregistered, 0), Vec::new());
        };

        let task = fetch_from(adapter, keyword, limit, with_details)
            .instrument(tracing::info_span!("source", source = %tag));
        match tokio::time::timeout(self.task_timeout, task).await {
            Ok(records) if records.is_empty() => (outcome(OutcomeStatus::Empty, 0), records),
            Ok(records) => {
                tracing::info!(source = %tag, count = records.len(), "source collected");
                (outcome(OutcomeStatus::Collected, records.len()), records)
            }
            Err(_) => {
                tracing::warn!(
                    source = %tag,
                    timeout_secs = self.task_timeout.as_secs(),
                    "source task timed out"
                );
                (outcome(OutcomeStatus::TimedOut, 0), Vec::new())
            }
        }
    }
}

async fn fetch_from(
    adapter: Arc<dyn SourceAdapter>,
    keyword: &str,
    limit: usize,
    with_details: bool,
) -> Vec<ContentRecord> {
    let mut hits = adapter.search(keyword, limit).await;
    hits.truncate(limit);
    if !with_details {
        return hits;
    }

    let mut enriched = Vec::with_capacity(hits.len());
    for hit in hits {
        match adapter.extract_detail(&hit.url).await {
            Some(detail) => enriched.push(merge_detail(hit, detail)),
            None => enriched.push(hit),
        }
    }
    enriched
}

fn compare_records(a: &ContentRecord, b: &ContentRecord) -> Ordering {
    let by_time = match (a.published_at(), b.published_at()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_time
        .then_with(|| a.platform_type.cmp(&b.platform_type))
        .then_with(|| a.url.cmp(&b.url))
}
