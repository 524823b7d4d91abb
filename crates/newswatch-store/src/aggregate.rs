//! Grouping and ranking over record snapshots.
//!
//! Everything here is a pure function over a slice of records so the same
//! code serves both the store queries and the trend analyzer.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime};
use newswatch_core::ContentRecord;
use serde::Serialize;

/// Sort key for records whose publish time does not parse: after every real
/// date.
const UNPARSEABLE_SENTINEL: NaiveDateTime = NaiveDateTime::MAX;

/// A record paired with its hot score, computed on read.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotRecord {
    #[serde(flatten)]
    pub record: ContentRecord,
    pub hot_score: u64,
}

impl From<ContentRecord> for HotRecord {
    fn from(record: ContentRecord) -> Self {
        let hot_score = record.hot_score();
        Self { record, hot_score }
    }
}

/// Summed engagement counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionTotals {
    pub read_count: u64,
    pub comment_count: u64,
    pub like_count: u64,
    pub share_count: u64,
    pub forward_count: u64,
}

impl InteractionTotals {
    /// Read + comment + like + share. Forwards are reported separately and
    /// not part of the dashboard total.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.read_count
            .saturating_add(self.comment_count)
            .saturating_add(self.like_count)
            .saturating_add(self.share_count)
    }
}

/// Records ordered by hot score, highest first. Ties keep input order.
#[must_use]
pub fn rank_by_hot_score(records: Vec<ContentRecord>, limit: Option<usize>) -> Vec<HotRecord> {
    let mut ranked: Vec<HotRecord> = records.into_iter().map(HotRecord::from).collect();
    ranked.sort_by(|a, b| b.hot_score.cmp(&a.hot_score));
    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}

/// Record count per platform display name.
#[must_use]
pub fn count_by_platform(records: &[ContentRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.platform.clone()).or_insert(0) += 1;
    }
    counts
}

/// Record count per publish day over the `days + 1` days ending at `today`.
///
/// Every day in the range is present, zero-filled. Records outside the range
/// or with an unparseable publish time are not counted.
#[must_use]
pub fn count_by_date(
    records: &[ContentRecord],
    days: u32,
    today: NaiveDate,
) -> BTreeMap<NaiveDate, usize> {
    let start = today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN);

    let mut counts: BTreeMap<NaiveDate, usize> = start
        .iter_days()
        .take_while(|d| *d <= today)
        .map(|d| (d, 0))
        .collect();

    for record in records {
        let Some(published) = record.published_at() else {
            continue;
        };
        if let Some(count) = counts.get_mut(&published.date()) {
            *count += 1;
        }
    }
    counts
}

/// The record with the earliest parseable publish time.
///
/// Unparseable times sort last; among equal times the first record wins.
#[must_use]
pub fn earliest(records: &[ContentRecord]) -> Option<&ContentRecord> {
    records
        .iter()
        .min_by_key(|r| r.published_at().unwrap_or(UNPARSEABLE_SENTINEL))
}

/// Occurrence count of every tag.
#[must_use]
pub fn tag_distribution(records: &[ContentRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for tag in records.iter().flat_map(|r| r.tags.iter()) {
        *counts.entry(tag.clone()).or_insert(0) += 1;
    }
    counts
}

#[must_use]
pub fn interaction_totals(records: &[ContentRecord]) -> InteractionTotals {
    records
        .iter()
        .fold(InteractionTotals::default(), |acc, r| InteractionTotals {
            read_count: acc.read_count.saturating_add(r.read_count),
            comment_count: acc.comment_count.saturating_add(r.comment_count),
            like_count: acc.like_count.saturating_add(r.like_count),
            share_count: acc.share_count.saturating_add(r.share_count),
            forward_count: acc.forward_count.saturating_add(r.forward_count),
        })
}

/// Records published between `start` and `end`, both days inclusive.
#[must_use]
pub fn filter_date_range(
    records: Vec<ContentRecord>,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<ContentRecord> {
    records
        .into_iter()
        .filter(|r| {
            r.published_at()
                .map(|ts| ts.date())
                .is_some_and(|d| d >= start && d <= end)
        })
        .collect()
}

/// Records carrying at least one of `tags`.
#[must_use]
pub fn filter_any_tag(records: Vec<ContentRecord>, tags: &[String]) -> Vec<ContentRecord> {
    records
        .into_iter()
        .filter(|r| r.tags.iter().any(|t| tags.contains(t)))
        .collect()
}
