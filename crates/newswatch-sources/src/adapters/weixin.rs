//! WeChat official-account articles: article search page plus browser
//! detail reads.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use newswatch_core::{ContentRecord, SourceTag};
use scraper::Html;

use super::{encode_query, finalize, now, SourceAdapter, WEIXIN_SEARCH_ENDPOINT};
use crate::browser::{self, BrowserLauncher, BrowserSession, SessionGuard};
use crate::error::SourceError;
use crate::fetch::PageFetcher;
use crate::markup::{element_text, first_text, selector};
use crate::publish_time::normalize_publish_time;

/// Search result links are relative to the search host.
const SEARCH_ORIGIN: &str = "https://weixin.sogou.com";

pub struct WeixinAdapter {
    fetcher: PageFetcher,
    browser: Option<Arc<dyn BrowserLauncher>>,
    wait: Duration,
    search_endpoint: String,
}

impl WeixinAdapter {
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
            search_endpoint: WEIXIN_SEARCH_ENDPOINT.to_owned(),
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
        let url = format!(
            "{}?type=2&query={}",
            self.search_endpoint,
            encode_query(keyword)
        );
        let html = self.fetcher.get_html(&url).await?;
        parse_results(&html, keyword, limit, now())
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

fn parse_results(
    html: &str,
    keyword: &str,
    limit: usize,
    crawl_time: NaiveDateTime,
) -> Result<Vec<ContentRecord>, SourceError> {
    let item_sel = selector(".news-box .news-list li")?;
    let title_sel = selector("h3 a")?;
    let summary_sel = selector(".txt-info")?;
    let time_sel = selector(".s2")?;

    let doc = Html::parse_document(html);
    let mut records = Vec::new();

    for item in doc.select(&item_sel).take(limit) {
        let Some(anchor) = item.select(&title_sel).next() else {
            continue;
        };
        let title = element_text(anchor);
        let href = anchor.value().attr("href").unwrap_or_default().trim();
        if title.is_empty() || href.is_empty() {
            continue;
        }
        let link = if href.starts_with("http") {
            href.to_owned()
        } else {
            format!("{SEARCH_ORIGIN}{href}")
        };

        let mut record = ContentRecord::new(SourceTag::Weixin, keyword, &link, crawl_time);
        record.title = title;
        record.summary = first_text(item, &summary_sel).unwrap_or_default();
        record.publish_time = normalize_publish_time(
            &first_text(item, &time_sel).unwrap_or_default(),
            crawl_time,
        );
        records.push(finalize(record));
    }
    Ok(records)
}

async fn read_article(
    session: &dyn BrowserSession,
    url: &str,
    wait: Duration,
) -> Result<ContentRecord, SourceError> {
    session.navigate(url).await?;
    session.wait_for("#activity-name", wait).await?;

    let crawl_time = now();
    let mut record = ContentRecord::new(SourceTag::Weixin, "", url, crawl_time);
    record.title = browser::first_text(session, None, "#activity-name")
        .await?
        .unwrap_or_default();
    record.content = browser::first_text(session, None, "#js_content")
        .await?
        .unwrap_or_default();
    let raw_time = browser::first_text(session, None, "#publish_time")
        .await?
        .unwrap_or_default();
    record.publish_time = normalize_publish_time(&raw_time, crawl_time);
    Ok(finalize(record))
}

#[async_trait]
impl SourceAdapter for WeixinAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Weixin
    }

    async fn search(&self, keyword: &str, limit: usize) -> Vec<ContentRecord> {
        match self.try_search(keyword, limit).await {
            Ok(records) => {
                tracing::debug!(source = "weixin", keyword, count = records.len(), "search done");
                records
            }
            Err(e) => {
                tracing::warn!(source = "weixin", keyword, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn extract_detail(&self, url: &str) -> Option<ContentRecord> {
        match self.try_extract(url).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source = "weixin", url, error = %e, "detail extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::browser::fake::FakeBrowser;
    use crate::fetch::FetchSettings;

    fn crawl() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn search_page_links_are_prefixed_with_search_host() {
        let html = r#"
          <ul class="news-list-wrap"></ul>
          <div class="news-box"><ul class="news-list">
            <li>
              <h3><a href="/link?url=abc">公众号文章</a></h3>
              <p class="txt-info">摘要</p>
              <span class="s2">2024-05-08</span>
            </li>
            <li><h3><a href="https://mp.weixin.qq.com/s/xyz">直接链接</a></h3></li>
            <li><p>no anchor</p></li>
          </ul></div>"#;
        let records = parse_results(html, "ai", 10, crawl()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url, "https://weixin.sogou.com/link?url=abc");
        assert_eq!(records[0].summary, "摘要");
        assert_eq!(records[0].publish_time, "2024-05-08 00:00:00");
        assert_eq!(records[1].url, "https://mp.weixin.qq.com/s/xyz");
        assert_eq!(records[1].platform, "WeChat Official Accounts");
    }

    #[tokio::test]
    async fn detail_reads_article_fields() {
        let url = "https://mp.weixin.qq.com/s/xyz";
        let page = r#"<h1 id="activity-name"> 标题 </h1>
                      <em id="publish_time">2024-05-07 21:00</em>
                      <div id="js_content"><p>正文</p></div>"#;
        let fake = Arc::new(FakeBrowser::with_pages(&[(url, page)]));
        let adapter = WeixinAdapter::new(
            PageFetcher::new(&FetchSettings {
                timeout_secs: 1,
                user_agent: "test".into(),
                max_retries: 0,
                backoff_base_secs: 0,
            })
            .unwrap(),
            Some(fake as Arc<dyn BrowserLauncher>),
            Duration::from_millis(50),
        );

        let record = adapter.extract_detail(url).await.unwrap();
        assert_eq!(record.title, "标题");
        assert_eq!(record.content, "正文");
        assert_eq!(record.publish_time, "2024-05-07 21:00:00");
        assert_eq!(record.comment_count, 0);
    }
}
