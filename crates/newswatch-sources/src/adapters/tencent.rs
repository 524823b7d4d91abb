//! Tencent News: site-scoped web search plus plain document detail pages.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use newswatch_core::{ContentRecord, SourceTag};
use scraper::Html;

use super::{finalize, now, sogou, SourceAdapter, SOGOU_SEARCH_ENDPOINT};
use crate::error::SourceError;
use crate::fetch::PageFetcher;
use crate::markup::{all_texts, first_text_of, selector};
use crate::publish_time::normalize_publish_time;

const ORIGIN: &str = "https://news.qq.com";
const SITE: &str = "news.qq.com";

pub struct TencentAdapter {
    fetcher: PageFetcher,
    search_endpoint: String,
}

impl TencentAdapter {
    #[must_use]
    pub fn new(fetcher: PageFetcher) -> Self {
        Self {
            fetcher,
            search_endpoint: SOGOU_SEARCH_ENDPOINT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_search_endpoint(mut self, endpoint: &str) -> Self {
        self.search_endpoint = endpoint.to_owned();
        self
    }

    async fn try_search(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<ContentRecord>, SourceError> {
        let url = sogou::site_search_url(&self.search_endpoint, keyword, SITE);
        let html = self.fetcher.get_html(&url).await?;
        sogou::parse_results(&html, SourceTag::Tencent, keyword, limit, ORIGIN, now())
    }

    async fn try_extract(&self, url: &str) -> Result<ContentRecord, SourceError> {
        let html = self.fetcher.get_html(url).await?;
        parse_article(&html, url, now())
    }
}

/// Parse an article page. Fails when neither a title nor body text is
/// present.
fn parse_article(
    html: &str,
    url: &str,
    crawl_time: NaiveDateTime,
) -> Result<ContentRecord, SourceError> {
    let left_title = selector(".LEFT h1")?;
    let any_title = selector("h1")?;
    let paragraphs = selector(".content-article p")?;
    let left_time = selector(".LEFT .article-info .time")?;
    let any_time = selector(".time")?;
    let left_tags = selector(".LEFT .tags a")?;
    let any_tags = selector(".tags a")?;

    let doc = Html::parse_document(html);
    let root = doc.root_element();

    let title = first_text_of(root, &[&left_title, &any_title]).unwrap_or_default();
    let content = all_texts(root, &paragraphs).join("\n");
    if title.is_empty() && content.is_empty() {
        return Err(SourceError::Parse {
            context: format!("article {url}"),
            reason: "no title or body".to_owned(),
        });
    }

    let mut tags = all_texts(root, &left_tags);
    if tags.is_empty() {
        tags = all_texts(root, &any_tags);
    }

    let mut record = ContentRecord::new(SourceTag::Tencent, "", url, crawl_time);
    record.title = title;
    record.content = content;
    record.tags = tags;
    record.publish_time = normalize_publish_time(
        &first_text_of(root, &[&left_time, &any_time]).unwrap_or_default(),
        crawl_time,
    );
    Ok(finalize(record))
}

#[async_trait]
impl SourceAdapter for TencentAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Tencent
    }

    async fn search(&self, keyword: &str, limit: usize) -> Vec<ContentRecord> {
        match self.try_search(keyword, limit).await {
            Ok(records) => {
                tracing::debug!(source = "tencent", keyword, count = records.len(), "search done");
                records
            }
            Err(e) => {
                tracing::warn!(source = "tencent", keyword, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn extract_detail(&self, url: &str) -> Option<ContentRecord> {
        match self.try_extract(url).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source = "tencent", url, error = %e, "detail extraction failed");
                None
            }
        }
    }
}
