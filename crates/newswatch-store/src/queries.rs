//! Read-side queries over the record collection.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use newswatch_core::{ContentRecord, SourceTag};

use crate::aggregate::{self, HotRecord, InteractionTotals};
use crate::store::RecordStore;
use crate::NEWS_COLLECTION;

impl RecordStore {
    pub async fn records_by_keyword(&self, keyword: &str) -> Vec<ContentRecord> {
        self.find(NEWS_COLLECTION, |r: &ContentRecord| r.keyword == keyword)
            .await
    }

    pub async fn records_by_platform_type(&self, source: SourceTag) -> Vec<ContentRecord> {
        self.find(NEWS_COLLECTION, |r: &ContentRecord| r.platform_type == source)
            .await
    }

    /// Records published between `start` and `end` (inclusive days).
    pub async fn records_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<ContentRecord> {
        aggregate::filter_date_range(self.load_all().await, start, end)
    }

    /// Records carrying any of `tags`.
    pub async fn records_by_tags(&self, tags: &[String]) -> Vec<ContentRecord> {
        aggregate::filter_any_tag(self.load_all().await, tags)
    }

    /// The `limit` hottest records across every keyword.
    pub async fn hot_records(&self, limit: usize) -> Vec<HotRecord> {
        aggregate::rank_by_hot_score(self.load_all().await, Some(limit))
    }

    pub async fn count_by_platform(&self) -> BTreeMap<String, usize> {
        aggregate::count_by_platform(&self.load_all().await)
    }

    /// Per-day record counts for the `days + 1` days ending at `today`.
    pub async fn count_by_date(&self, days: u32, today: NaiveDate) -> BTreeMap<NaiveDate, usize> {
        aggregate::count_by_date(&self.load_all().await, days, today)
    }

    pub async fn earliest_by_keyword(&self, keyword: &str) -> Option<ContentRecord> {
        aggregate::earliest(&self.records_by_keyword(keyword).await).cloned()
    }

    pub async fn tag_distribution_by_keyword(&self, keyword: &str) -> BTreeMap<String, usize> {
        aggregate::tag_distribution(&self.records_by_keyword(keyword).await)
    }

    pub async fn platform_distribution_by_keyword(
        &self,
        keyword: &str,
    ) -> BTreeMap<String, usize> {
        aggregate::count_by_platform(&self.records_by_keyword(keyword).await)
    }

    pub async fn interaction_totals_by_keyword(&self, keyword: &str) -> InteractionTotals {
        aggregate::interaction_totals(&self.records_by_keyword(keyword).await)
    }
}
