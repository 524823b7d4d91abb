use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::{self, local_time};

/// Identifies the external source an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceTag {
    Tencent,
    Toutiao,
    Weixin,
    Weibo,
}

impl SourceTag {
    pub const ALL: [SourceTag; 4] = [
        SourceTag::Tencent,
        SourceTag::Toutiao,
        SourceTag::Weixin,
        SourceTag::Weibo,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SourceTag::Tencent => "tencent",
            SourceTag::Toutiao => "toutiao",
            SourceTag::Weixin => "weixin",
            SourceTag::Weibo => "weibo",
        }
    }

    /// Human-readable platform name written into `ContentRecord::platform`.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            SourceTag::Tencent => "Tencent News",
            SourceTag::Toutiao => "Toutiao",
            SourceTag::Weixin => "WeChat Official Accounts",
            SourceTag::Weibo => "Weibo",
        }
    }
}

impl std::fmt::Display for SourceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tencent" => Ok(SourceTag::Tencent),
            "toutiao" => Ok(SourceTag::Toutiao),
            "weixin" => Ok(SourceTag::Weixin),
            "weibo" => Ok(SourceTag::Weibo),
            other => Err(format!(
                "unknown source '{other}'; expected one of tencent, toutiao, weixin, weibo"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// A single normalized item ingested from a source.
///
/// `url` is the dedup key within the record collection. `publish_time` is
/// kept as text because sources do not always yield a parseable time; use
/// [`ContentRecord::published_at`] to read it as a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub id: Uuid,
    pub keyword: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    pub url: String,
    pub platform: String,
    pub platform_type: SourceTag,
    #[serde(default)]
    pub publish_time: String,
    #[serde(with = "local_time")]
    pub crawl_time: NaiveDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub read_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub share_count: u64,
    #[serde(default)]
    pub forward_count: u64,
    #[serde(default)]
    pub sentiment: Sentiment,
}

impl ContentRecord {
    /// Create an empty record for `url` from `source`, stamped with a fresh
    /// id and the given crawl time.
    #[must_use]
    pub fn new(source: SourceTag, keyword: &str, url: &str, crawl_time: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            keyword: keyword.to_string(),
            title: String::new(),
            summary: String::new(),
            content: String::new(),
            url: url.to_string(),
            platform: source.display_name().to_string(),
            platform_type: source,
            publish_time: String::new(),
            crawl_time,
            tags: Vec::new(),
            read_count: 0,
            comment_count: 0,
            like_count: 0,
            share_count: 0,
            forward_count: 0,
            sentiment: Sentiment::Neutral,
        }
    }

    /// Weighted engagement score used to rank "hot" listings.
    ///
    /// `read + 5*comment + 2*like + 3*share + 3*forward`, saturating.
    #[must_use]
    pub fn hot_score(&self) -> u64 {
        self.read_count
            .saturating_add(self.comment_count.saturating_mul(5))
            .saturating_add(self.like_count.saturating_mul(2))
            .saturating_add(self.share_count.saturating_mul(3))
            .saturating_add(self.forward_count.saturating_mul(3))
    }

    /// Publish time parsed from the canonical format, if it parses.
    #[must_use]
    pub fn published_at(&self) -> Option<NaiveDateTime> {
        time::parse_timestamp(&self.publish_time)
    }

    /// Tag set with duplicates removed, first occurrence wins.
    pub fn dedup_tags(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.tags.retain(|t| seen.insert(t.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn crawl_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn hot_score_uses_fixed_weights() {
        let mut r = ContentRecord::new(SourceTag::Weibo, "rust", "https://x/1", crawl_time());
        r.read_count = 100;
        r.comment_count = 10;
        r.like_count = 7;
        r.share_count = 3;
        r.forward_count = 2;
        assert_eq!(r.hot_score(), 100 + 50 + 14 + 9 + 6);
    }

    #[test]
    fn hot_score_saturates_instead_of_overflowing() {
        let mut r = ContentRecord::new(SourceTag::Weibo, "rust", "https://x/1", crawl_time());
        r.read_count = u64::MAX;
        r.comment_count = 1;
        assert_eq!(r.hot_score(), u64::MAX);
    }

    #[test]
    fn published_at_parses_canonical_time_only() {
        let mut r = ContentRecord::new(SourceTag::Tencent, "rust", "https://x/1", crawl_time());
        r.publish_time = "2024-04-30 09:00:00".to_string();
        assert!(r.published_at().is_some());
        r.publish_time = "yesterday".to_string();
        assert!(r.published_at().is_none());
    }

    #[test]
    fn record_serializes_with_camel_case_fields() {
        let r = ContentRecord::new(SourceTag::Toutiao, "rust", "https://x/1", crawl_time());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["platformType"], "toutiao");
        assert_eq!(json["crawlTime"], "2024-05-01 12:00:00");
        assert_eq!(json["sentiment"], "neutral");
        assert_eq!(json["readCount"], 0);
    }

    #[test]
    fn record_deserializes_with_missing_optional_fields() {
        let json = serde_json::json!({
            "id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
            "keyword": "rust",
            "title": "t",
            "url": "https://x/1",
            "platform": "Weibo",
            "platformType": "weibo",
            "crawlTime": "2024-05-01 12:00:00"
        });
        let r: ContentRecord = serde_json::from_value(json).unwrap();
        assert!(r.tags.is_empty());
        assert_eq!(r.sentiment, Sentiment::Neutral);
        assert_eq!(r.hot_score(), 0);
    }

    #[test]
    fn source_tag_parses_case_insensitively() {
        assert_eq!("Weibo".parse::<SourceTag>(), Ok(SourceTag::Weibo));
        assert!("twitter".parse::<SourceTag>().is_err());
    }

    #[test]
    fn dedup_tags_keeps_first_occurrence() {
        let mut r = ContentRecord::new(SourceTag::Tencent, "rust", "https://x/1", crawl_time());
        r.tags = vec!["a".into(), "b".into(), "a".into()];
        r.dedup_tags();
        assert_eq!(r.tags, vec!["a".to_string(), "b".to_string()]);
    }
}
