//! The [`SourceAdapter`] contract and its four variants.

mod sogou;
mod tencent;
mod toutiao;
mod weibo;
mod weixin;

use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use newswatch_core::{ContentRecord, SourceTag};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use crate::sentiment;

pub use tencent::TencentAdapter;
pub use toutiao::ToutiaoAdapter;
pub use weibo::WeiboAdapter;
pub use weixin::WeixinAdapter;

/// Default site-scoped web search used by the Tencent and Toutiao variants.
pub const SOGOU_SEARCH_ENDPOINT: &str = "https://www.sogou.com/sogou";
/// Default WeChat article search.
pub const WEIXIN_SEARCH_ENDPOINT: &str = "https://weixin.sogou.com/weixin";
/// Default Weibo post search.
pub const WEIBO_SEARCH_ENDPOINT: &str = "https://s.weibo.com/weibo";

/// One external source, normalized to [`ContentRecord`].
///
/// Neither method fails: network, parse and browser errors are logged and
/// surface as an empty result or `None`.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn tag(&self) -> SourceTag;

    /// Up to `limit` partial records for `keyword`.
    async fn search(&self, keyword: &str, limit: usize) -> Vec<ContentRecord>;

    /// The full record behind `url`: content, tags and engagement counters.
    /// The returned record has an empty `keyword`.
    async fn extract_detail(&self, url: &str) -> Option<ContentRecord>;
}

pub(crate) fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub(crate) fn encode_query(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}

/// Last normalization step shared by every variant: dedupe tags, label
/// sentiment and flag publish times later than the crawl.
pub(crate) fn finalize(mut record: ContentRecord) -> ContentRecord {
    record.dedup_tags();
    record.sentiment = sentiment::label_record(&record);
    if record
        .published_at()
        .is_some_and(|published| published > record.crawl_time)
    {
        tracing::warn!(
            url = %record.url,
            publish_time = %record.publish_time,
            "publish time is later than crawl time"
        );
    }
    record
}

/// Fold a detail record into the search hit it was fetched for.
///
/// The hit keeps its id, keyword and summary; the detail wins for every
/// field it actually carries.
#[must_use]
pub fn merge_detail(mut hit: ContentRecord, detail: ContentRecord) -> ContentRecord {
    if hit.title.is_empty() {
        hit.title = detail.title;
    }
    if !detail.content.is_empty() {
        hit.content = detail.content;
    }
    if !detail.publish_time.is_empty() {
        hit.publish_time = detail.publish_time;
    }
    if !detail.tags.is_empty() {
        hit.tags = detail.tags;
    }
    let counters = [
        (&mut hit.read_count, detail.read_count),
        (&mut hit.comment_count, detail.comment_count),
        (&mut hit.like_count, detail.like_count),
        (&mut hit.share_count, detail.share_count),
        (&mut hit.forward_count, detail.forward_count),
    ];
    for (slot, value) in counters {
        if value > 0 {
            *slot = value;
        }
    }
    finalize(hit)
}
