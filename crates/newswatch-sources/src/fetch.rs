use std::time::Duration;

use newswatch_core::AppConfig;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::Client;

use crate::error::SourceError;
use crate::helpers::ensure_scheme;
use crate::retry::retry_with_backoff;

/// Knobs for [`PageFetcher`], usually taken from [`AppConfig`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub backoff_base_secs: u64,
}

impl FetchSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.fetch_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

/// Header set sent with every document fetch, mimicking a desktop browser.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

/// Plain document fetcher shared by the markup-parsing adapters.
///
/// Throttling (429) and network failures are retried with exponential
/// backoff; any other non-2xx status is returned as
/// [`SourceError::UnexpectedStatus`] on the first attempt.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl PageFetcher {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(settings: &FetchSettings) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(settings.timeout_secs.min(10)))
            .user_agent(settings.user_agent.as_str())
            .default_headers(browser_headers())
            .build()?;
        Ok(Self {
            client,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    /// Fetch `url` and return the response body as text. Scheme-less urls
    /// are fetched over `https://`.
    ///
    /// # Errors
    ///
    /// - [`SourceError::RateLimited`]: HTTP 429 after all retries.
    /// - [`SourceError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`SourceError::Http`]: network failure after all retries.
    pub async fn get_html(&self, url: &str) -> Result<String, SourceError> {
        let url = ensure_scheme(url);
        tracing::debug!(url = %url, "fetching document");

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(0);
                    let host = response.url().host_str().unwrap_or_default().to_owned();
                    return Err(SourceError::RateLimited {
                        host,
                        retry_after_secs,
                    });
                }

                if !status.is_success() {
                    return Err(SourceError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }

                Ok(response.text().await?)
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
