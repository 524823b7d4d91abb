//! Trend reports and dashboard stats.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use newswatch_core::ContentRecord;
use newswatch_store::aggregate::{self, InteractionTotals};
use newswatch_store::RecordStore;
use serde::Serialize;
use tracing::Instrument;

use crate::conclusion::generate_conclusion;
use crate::distribution::SentimentCounts;
use crate::heat::{HeatChange, TrendDirection};
use crate::origin::{analyze_origin, OriginAnalysis};

/// Longest daily-count range a report covers; larger requests are clamped.
pub const MAX_REPORT_DAYS: u32 = 3650;

/// Everything the presentation layer needs to render one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub keyword: String,
    pub days: u32,
    pub heat_change: HeatChange,
    pub origin_analysis: OriginAnalysis,
    pub tag_distribution: BTreeMap<String, usize>,
    pub sentiment_analysis: SentimentCounts,
    pub platform_distribution: BTreeMap<String, usize>,
    pub interaction_totals: InteractionTotals,
    pub trend_direction: TrendDirection,
    /// Records per publish day over the `days + 1` days ending at `now`.
    pub daily_counts: BTreeMap<NaiveDate, usize>,
    pub conclusion: String,
}

/// Build a report from one keyword's records. `None` when there are none.
///
/// `days` is clamped to [`MAX_REPORT_DAYS`].
#[must_use]
pub fn analyze_records(
    keyword: &str,
    records: &[ContentRecord],
    days: u32,
    now: NaiveDateTime,
) -> Option<TrendReport> {
    let days = days.min(MAX_REPORT_DAYS);
    let origin_analysis = analyze_origin(keyword, records)?;
    let heat_change = HeatChange::compute(records, now);
    let sentiment_analysis = SentimentCounts::tally(records);
    let platform_distribution = aggregate::count_by_platform(records);
    let conclusion = generate_conclusion(
        keyword,
        heat_change.trend_direction,
        heat_change.rate_24h,
        sentiment_analysis,
        &platform_distribution,
    );

    Some(TrendReport {
        keyword: keyword.to_string(),
        days,
        trend_direction: heat_change.trend_direction,
        heat_change,
        origin_analysis,
        tag_distribution: aggregate::tag_distribution(records),
        sentiment_analysis,
        platform_distribution,
        interaction_totals: aggregate::interaction_totals(records),
        daily_counts: aggregate::count_by_date(records, days, now.date()),
        conclusion,
    })
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub keyword_count: usize,
    pub active_keyword_count: usize,
    pub platform_count: usize,
    pub active_platform_count: usize,
    pub record_count: usize,
    /// Read + comment + like + share over all records.
    pub total_interactions: u64,
    /// 24h heat change across every keyword.
    pub heat_change: HeatChange,
}

/// Reads records back from the store and derives reports from them.
pub struct TrendAnalyzer {
    store: Arc<RecordStore>,
    span: tracing::Span,
}

impl TrendAnalyzer {
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            span: tracing::info_span!("trend_analyzer"),
        }
    }

    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Trend report for `keyword` relative to `now`.
    ///
    /// Returns `None` when the keyword has no stored records.
    pub async fn analyze_trend(
        &self,
        keyword: &str,
        days: u32,
        now: NaiveDateTime,
    ) -> Option<TrendReport> {
        let keyword = keyword.trim();
        async {
            let records = self.store.records_by_keyword(keyword).await;
            if records.is_empty() {
                tracing::warn!(keyword, "no records for keyword");
                return None;
            }
            let report = analyze_records(keyword, &records, days, now);
            if let Some(report) = &report {
                tracing::info!(
                    keyword,
                    records = records.len(),
                    trend = %report.trend_direction,
                    rate_24h = report.heat_change.rate_24h,
                    "trend analyzed"
                );
            }
            report
        }
        .instrument(self.span.clone())
        .await
    }

    pub async fn dashboard_stats(&self, now: NaiveDateTime) -> DashboardStats {
        async {
            let keywords = self.store.list_keywords().await;
            let platforms = self.store.list_platforms().await;
            let records = self.store.load_all().await;

            DashboardStats {
                keyword_count: keywords.len(),
                active_keyword_count: keywords.iter().filter(|k| k.is_active()).count(),
                platform_count: platforms.len(),
                active_platform_count: platforms.iter().filter(|p| p.is_active()).count(),
                record_count: records.len(),
                total_interactions: aggregate::interaction_totals(&records).total(),
                heat_change: HeatChange::compute(&records, now),
            }
        }
        .instrument(self.span.clone())
        .await
    }
}
