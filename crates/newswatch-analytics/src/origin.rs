//! Where a keyword's coverage started.

use newswatch_core::{time, ContentRecord};
use newswatch_store::aggregate::{self, HotRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginAnalysis {
    /// Carries the record's computed `hotScore` alongside its fields.
    pub earliest_record: HotRecord,
    /// `YYYY-MM-DD` of the earliest publish time, empty when it does not
    /// parse.
    pub earliest_date: String,
    pub origin_platform: String,
    pub possible_causes: Vec<String>,
}

/// The earliest record of `records` and the candidate causes around it.
///
/// Records whose publish time does not parse only win when no record has a
/// parseable one.
#[must_use]
pub fn analyze_origin(keyword: &str, records: &[ContentRecord]) -> Option<OriginAnalysis> {
    let earliest = aggregate::earliest(records)?;
    let earliest_date = earliest
        .published_at()
        .map(|ts| time::format_date(ts.date()))
        .unwrap_or_default();

    Some(OriginAnalysis {
        earliest_record: HotRecord::from(earliest.clone()),
        earliest_date,
        origin_platform: earliest.platform.clone(),
        possible_causes: possible_causes(keyword),
    })
}

fn possible_causes(keyword: &str) -> Vec<String> {
    vec![
        format!("A sudden {keyword}-related event drew public attention"),
        format!("New research findings on {keyword} were published"),
        format!("Authoritative media ran in-depth coverage of {keyword}"),
    ]
}
