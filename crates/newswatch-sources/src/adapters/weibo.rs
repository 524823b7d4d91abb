//! Weibo: search and detail both need a rendered page.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use newswatch_core::{ContentRecord, SourceTag};

use super::{encode_query, finalize, now, SourceAdapter, WEIBO_SEARCH_ENDPOINT};
use crate::browser::{self, BrowserLauncher, BrowserSession, ElementId, SessionGuard};
use crate::error::SourceError;
use crate::helpers::{derive_title, extract_number, normalize_url};
use crate::publish_time::normalize_publish_time;

const ORIGIN: &str = "https://weibo.com";

pub struct WeiboAdapter {
    browser: Option<Arc<dyn BrowserLauncher>>,
    wait: Duration,
    search_endpoint: String,
}

impl WeiboAdapter {
    /// Without a `browser` the adapter yields no data at all.
    #[must_use]
    pub fn new(browser: Option<Arc<dyn BrowserLauncher>>, wait: Duration) -> Self {
        Self {
            browser,
            wait,
            search_endpoint: WEIBO_SEARCH_ENDPOINT.to_owned(),
        }
    }

    #[must_use]
    pub fn with_search_endpoint(mut self, endpoint: &str) -> Self {
        self.search_endpoint = endpoint.to_owned();
        self
    }

    fn launcher(&self) -> Result<&Arc<dyn BrowserLauncher>, SourceError> {
        self.browser
            .as_ref()
            .ok_or_else(|| SourceError::Unavailable("no WebDriver endpoint configured".into()))
    }

    async fn try_search(
        &self,
        keyword: &str,
        limit: usize,
    ) -> Result<Vec<ContentRecord>, SourceError> {
        let url = format!("{}?q={}", self.search_endpoint, encode_query(keyword));
        let session = SessionGuard::open(&**self.launcher()?).await?;
        let result = read_search(&*session, &url, keyword, limit, self.wait).await;
        session.close().await;
        result
    }

    async fn try_extract(&self, url: &str) -> Result<ContentRecord, SourceError> {
        let session = SessionGuard::open(&**self.launcher()?).await?;
        let result = read_post(&*session, url, self.wait).await;
        session.close().await;
        result
    }
}

async fn count_of(
    session: &dyn BrowserSession,
    scope: Option<&ElementId>,
    css: &str,
) -> Result<u64, SourceError> {
    Ok(browser::first_text(session, scope, css)
        .await?
        .map_or(0, |t| extract_number(&t)))
}

async fn read_search(
    session: &dyn BrowserSession,
    url: &str,
    keyword: &str,
    limit: usize,
    wait: Duration,
) -> Result<Vec<ContentRecord>, SourceError> {
    session.navigate(url).await?;
    session.wait_for(".card-wrap", wait).await?;

    let crawl_time = now();
    let mut records = Vec::new();
    let cards = session.find_all(None, ".card-wrap").await?;

    for card in cards.iter().take(limit) {
        let scope = Some(card);
        let Some(content) = browser::first_text(session, scope, ".content p.txt").await? else {
            continue;
        };
        let href = browser::first_attribute(session, scope, ".content .from a:first-child", "href")
            .await?
            .unwrap_or_default();
        let link = normalize_url(&href, ORIGIN);
        if link.is_empty() {
            tracing::debug!(keyword, "weibo card without permalink, skipped");
            continue;
        }

        let mut record = ContentRecord::new(SourceTag::Weibo, keyword, &link, crawl_time);
        record.title = derive_title(&content);
        record.content = content;
        let raw_time = browser::first_text(session, scope, ".content .from a:first-child")
            .await?
            .unwrap_or_default();
        record.publish_time = normalize_publish_time(&raw_time, crawl_time);
        record.like_count = count_of(session, scope, ".card-act .pos").await?;
        record.forward_count = count_of(session, scope, ".card-act ul li:nth-child(2)").await?;
        record.comment_count = count_of(session, scope, ".card-act ul li:nth-child(3)").await?;
        records.push(finalize(record));
    }
    Ok(records)
}

async fn read_post(
    session: &dyn BrowserSession,
    url: &str,
    wait: Duration,
) -> Result<ContentRecord, SourceError> {
    session.navigate(url).await?;
    session.wait_for(".WB_text", wait).await?;

    let crawl_time = now();
    let mut record = ContentRecord::new(SourceTag::Weibo, "", url, crawl_time);
    record.content = browser::first_text(session, None, ".WB_text")
        .await?
        .unwrap_or_default();
    record.title = derive_title(&record.content);
    let raw_time = browser::first_text(session, None, ".WB_from a:first-child")
        .await?
        .unwrap_or_default();
    record.publish_time = normalize_publish_time(&raw_time, crawl_time);
    record.forward_count = count_of(
        session,
        None,
        ".WB_handle li:nth-child(2) .line span:last-child",
    )
    .await?;
    record.comment_count = count_of(
        session,
        None,
        ".WB_handle li:nth-child(3) .line span:last-child",
    )
    .await?;
    record.like_count = count_of(
        session,
        None,
        ".WB_handle li:nth-child(4) .line span:last-child",
    )
    .await?;
    Ok(finalize(record))
}

#[async_trait]
impl SourceAdapter for WeiboAdapter {
    fn tag(&self) -> SourceTag {
        SourceTag::Weibo
    }

    async fn search(&self, keyword: &str, limit: usize) -> Vec<ContentRecord> {
        match self.try_search(keyword, limit).await {
            Ok(records) => {
                tracing::debug!(source = "weibo", keyword, count = records.len(), "search done");
                records
            }
            Err(e) => {
                tracing::warn!(source = "weibo", keyword, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn extract_detail(&self, url: &str) -> Option<ContentRecord> {
        match self.try_extract(url).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(source = "weibo", url, error = %e, "detail extraction failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::browser::fake::FakeBrowser;

    const SEARCH_PAGE: &str = r#"
      <div class="card-wrap">
        <div class="content">
          <a class="name">用户A</a>
          <p class="txt">新能源汽车今年的销量实现了大幅增长，多家车企发布了新的产品和技术路线图</p>
          <p class="from"><a href="//weibo.com/1/AbC">5分钟前</a><a>来自 iPhone</a></p>
        </div>
        <div class="card-act"><ul>
          <li><a class="pos">赞 12</a></li>
          <li>转发 3</li>
          <li>评论 1,204</li>
        </ul></div>
      </div>
      <div class="card-wrap"><div class="content"><p class="from"><a href="//weibo.com/2">x</a></p></div></div>
      <div class="card-wrap">
        <div class="content">
          <p class="txt">短微博</p>
          <p class="from"><a href="//weibo.com/3/XyZ">今天 08:00</a></p>
        </div>
      </div>"#;

    fn adapter(fake: &Arc<FakeBrowser>) -> WeiboAdapter {
        WeiboAdapter::new(
            Some(Arc::clone(fake) as Arc<dyn BrowserLauncher>),
            Duration::from_millis(50),
        )
        .with_search_endpoint("https://s.weibo.test/weibo")
    }

    #[tokio::test]
    async fn search_reads_cards_into_records() {
        let fake = Arc::new(FakeBrowser::with_pages(&[(
            "https://s.weibo.test/weibo?q=ev",
            SEARCH_PAGE,
        )]));
        let records = adapter(&fake).search("ev", 10).await;

        assert_eq!(records.len(), 2, "card without text is skipped");
        let first = &records[0];
        assert_eq!(first.url, "https://weibo.com/1/AbC");
        assert_eq!(first.keyword, "ev");
        assert!(first.title.ends_with("..."));
        assert_eq!(first.title.chars().count(), 33);
        assert_eq!(first.like_count, 12);
        assert_eq!(first.forward_count, 3);
        assert_eq!(first.comment_count, 1204);
        assert_eq!(records[1].title, "短微博");
        assert_eq!(fake.opened.load(Ordering::SeqCst), 1);
        assert_eq!(fake.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn search_respects_limit() {
        let fake = Arc::new(FakeBrowser::with_pages(&[(
            "https://s.weibo.test/weibo?q=ev",
            SEARCH_PAGE,
        )]));
        assert_eq!(adapter(&fake).search("ev", 1).await.len(), 1);
    }

    #[tokio::test]
    async fn detail_reads_post_counters() {
        let url = "https://weibo.com/1/AbC";
        let page = r#"
          <div class="WB_text">帖子正文</div>
          <div class="WB_from"><a>2024-05-09 07:30</a></div>
          <div class="WB_handle"><ul>
            <li><span class="line"><span>收藏</span></span></li>
            <li><span class="line"><span>icon</span><span>8</span></span></li>
            <li><span class="line"><span>icon</span><span>9</span></span></li>
            <li><span class="line"><span>icon</span><span>10</span></span></li>
          </ul></div>"#;
        let fake = Arc::new(FakeBrowser::with_pages(&[(url, page)]));
        let record = adapter(&fake).extract_detail(url).await.unwrap();
        assert_eq!(record.content, "帖子正文");
        assert_eq!(record.title, "帖子正文");
        assert_eq!(record.publish_time, "2024-05-09 07:30:00");
        assert_eq!(
            (record.forward_count, record.comment_count, record.like_count),
            (8, 9, 10)
        );
    }

    #[tokio::test]
    async fn no_browser_means_no_data() {
        let adapter = WeiboAdapter::new(None, Duration::from_millis(10));
        assert!(adapter.search("ev", 5).await.is_empty());
        assert!(adapter.extract_detail("https://weibo.com/1").await.is_none());
    }

    #[tokio::test]
    async fn refused_session_yields_empty_search() {
        let fake = Arc::new(FakeBrowser::refusing());
        assert!(adapter(&fake).search("ev", 5).await.is_empty());
    }
}
