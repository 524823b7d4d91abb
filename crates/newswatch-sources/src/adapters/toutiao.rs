//! Toutiao: site-scoped web search; detail pages render client-side and
//! are read through a browser session.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use newswatch_core::{ContentRecord, SourceTag};

use super::{finalize, now, sogou, SourceAdapter, SOGOU_SEARCH_ENDPOINT};
use crate::browser::{self, BrowserLauncher, BrowserSession, SessionGuard};
use crate::error::SourceError;
use crate::fetch::PageFetcher;
use crate::helpers::extract_number;
use crate::publish_time::normalize_publish_time;

const ORIGIN: &str = "https://www.toutiao.com";
const SITE: &str = "www.toutiao.com";

pub struct ToutiaoAdapter {
    fetcher: PageFetcher,
    browser: Option<Arc<dyn BrowserLauncher>>,
    wait: Duration,
    search_endpoint: String,
}

impl ToutiaoAdapter {
    /// Without a `browser`, searches still work but details are unavailable.
    #[must_use]
    pub fn new(
        fetcher: PageFetcher,
        browser: Option<Arc<dyn BrowserLauncher>>,
        wait: Duration,
    ) -> Self {
        Self {
            fetcher,
            browser,
            wait,
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
        sogou::parse_results(&html, SourceTag::Toutiao, keyword, limit, ORIGIN, now())
    }

    async fn try_extract(&self, url: &str) -> Result<ContentRecord, SourceError> {
        let launcher = self
            .browser
            .as_ref()
            .ok_or_else(|| SourceError::Unavailable("no WebDriver endpoint configured".into()))?;
        let session = SessionGuard::open(&**launcher).await?;
        let result = read_article(&*session, url, self.wait).await;
        session.close().await;
        result
    }
}

async fn read_article(
    session: &dyn BrowserSession,
    url: &str,
    wait: Duration,
) -> Result<ContentRecord, SourceError> {
    session.navigate(url).await?;
    session.wait_for("h1", wait).await?;

    let crawl_time = now();
    let mut record = ContentRecord::new(SourceTag::Toutiao, "", url, crawl_time);
    record.title = browser::first_text(session, None, "h1")
        .await?
        .unwrap_or_default();
    record.content = browser::all_texts(session, None, ".article-content p")
        .await?
        .join("\n");
    let raw_time = browser::first_text(session, None, ".article-meta .time")
        .await?
        .unwrap_or_default();
    record.publish_time = normalize_publish_time(&raw_time, crawl_time);
    record.tags = browser::all_texts(session, None, ".tag-list .tag").await?;
    record.read_count = browser::first_text(session, None, ".read-count")
        .await?
        .map_or(0, |t| extract_number(&t));
    record.comment_count = browser::first_text(session, None, ".comment-count")
        .await?
        .map_or(0, |t| extract_number(&t));
    Ok(finalize(record))
}

#[async_trait]
impl SourceAdapter for ToutiaoAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Toutiao
    }

    async fn search(&self, keyword: &str, limit: usize) -> Vec<ContentRecord> {
        match self.try_search(keyword, limit).await {
            Ok(records) => {
                tracing::debug!(source = "toutiao", keyword, count = records.len(), "search done");
                records
            }
            Err(e) => {
                tracing::warn!(source = "toutiao", keyword, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn extract_detail(&self, url: &str) -> Option<ContentRecord> {
        match self.try_extract(url).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source = "toutiao", url, error = %e, "detail extraction failed");
                None
            }
        }
    }
}
