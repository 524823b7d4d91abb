//! Result-page parser for the site-scoped web search.

use chrono::NaiveDateTime;
use newswatch_core::{ContentRecord, SourceTag};
use scraper::Html;

use crate::error::SourceError;
use crate::helpers::normalize_url;
use crate::markup::{first_text, selector};
use crate::publish_time::normalize_publish_time;

/// `{endpoint}?query=<keyword>&ie=utf8&insite=<site>`
pub(crate) fn site_search_url(endpoint: &str, keyword: &str, site: &str) -> String {
    format!(
        "{endpoint}?query={}&ie=utf8&insite={site}",
        super::encode_query(keyword)
    )
}

/// Parse up to `limit` hits from a result page. Hits without a title or
/// link are skipped; relative links resolve against `origin`.
pub(crate) fn parse_results(
    html: &str,
    source: SourceTag,
    keyword: &str,
    limit: usize,
    origin: &str,
    crawl_time: NaiveDateTime,
) -> Result<Vec<ContentRecord>, SourceError> {
    let item_sel = selector(".vrwrap")?;
    let title_sel = selector(".vr-title a")?;
    let summary_sel = selector(".vr-summary")?;
    let time_sel = selector(".fz-mid.c-color-gray2")?;

    let doc = Html::parse_document(html);
    let mut records = Vec::new();

    for item in doc.select(&item_sel).take(limit) {
        let Some(anchor) = item.select(&title_sel).next() else {
            tracing::debug!(source = %source, "search hit without title link, skipped");
            continue;
        };
        let title = crate::markup::element_text(anchor);
        let link = normalize_url(anchor.value().attr("href").unwrap_or_default(), origin);
        if title.is_empty() || link.is_empty() {
            continue;
        }

        let mut record = ContentRecord::new(source, keyword, &link, crawl_time);
        record.title = title;
        record.summary = first_text(item, &summary_sel).unwrap_or_default();
        record.publish_time = normalize_publish_time(
            &first_text(item, &time_sel).unwrap_or_default(),
            crawl_time,
        );
        records.push(super::finalize(record));
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const PAGE: &str = r#"
    <html><body>
      <div class="vrwrap">
        <h3 class="vr-title"><a href="https://news.qq.com/rain/a/1">新能源汽车 销量增长</a></h3>
        <p class="vr-summary">  summary one </p>
        <span class="fz-mid c-color-gray2">3小时前</span>
      </div>
      <div class="vrwrap">
        <h3 class="vr-title"><a href="//news.qq.com/rain/a/2">second</a></h3>
      </div>
      <div class="vrwrap"><p class="vr-summary">no title link</p></div>
      <div class="vrwrap">
        <h3 class="vr-title"><a href="/rain/a/3">third</a></h3>
      </div>
    </body></html>"#;

    fn crawl() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn parses_hits_and_resolves_links() {
        let records = parse_results(
            PAGE,
            SourceTag::Tencent,
            "新能源",
            10,
            "https://news.qq.com",
            crawl(),
        )
        .unwrap();

        let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            [
                "https://news.qq.com/rain/a/1",
                "https://news.qq.com/rain/a/2",
                "https://news.qq.com/rain/a/3"
            ]
        );
        let first = &records[0];
        assert_eq!(first.summary, "summary one");
        assert_eq!(first.publish_time, "2024-05-10 09:00:00");
        assert_eq!(first.platform, "Tencent News");
        assert_eq!(first.keyword, "新能源");
        assert!(records[1].publish_time.is_empty());
    }

    #[test]
    fn limit_counts_result_items() {
        let records =
            parse_results(PAGE, SourceTag::Toutiao, "k", 1, "https://www.toutiao.com", crawl())
                .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn search_url_is_site_scoped() {
        assert_eq!(
            site_search_url("https://www.sogou.com/sogou", "AI", "news.qq.com"),
            "https://www.sogou.com/sogou?query=AI&ie=utf8&insite=news.qq.com"
        );
    }
}
