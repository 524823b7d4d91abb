//! Read-only reporting commands.

use std::sync::Arc;

use chrono::Local;
use newswatch_analytics::TrendAnalyzer;
use newswatch_store::RecordStore;

use crate::output::print_json;

pub(crate) async fn run_analyze(
    store: Arc<RecordStore>,
    keyword: &str,
    days: u32,
) -> anyhow::Result<()> {
    let analyzer = TrendAnalyzer::new(store);
    let now = Local::now().naive_local();
    match analyzer.analyze_trend(keyword, days, now).await {
        Some(report) => print_json(&report),
        None => print_json(&serde_json::json!({})),
    }
}

pub(crate) async fn run_hot(store: &RecordStore, limit: usize) -> anyhow::Result<()> {
    print_json(&store.hot_records(limit).await)
}

pub(crate) async fn run_stats(store: Arc<RecordStore>) -> anyhow::Result<()> {
    let analyzer = TrendAnalyzer::new(store);
    let stats = analyzer.dashboard_stats(Local::now().naive_local()).await;
    print_json(&stats)
}
