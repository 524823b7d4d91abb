use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use newswatch_core::{AppConfig, SourceTag};

use crate::adapters::{SourceAdapter, TencentAdapter, ToutiaoAdapter, WeiboAdapter, WeixinAdapter};
use crate::browser::{BrowserLauncher, WebDriverLauncher};
use crate::error::SourceError;
use crate::fetch::{FetchSettings, PageFetcher};

/// Adapters keyed by the source they serve.
#[derive(Default, Clone)]
pub struct SourceRegistry {
    adapters: BTreeMap<SourceTag, Arc<dyn SourceAdapter>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("sources", &self.tags())
            .finish()
    }
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `adapter` under its own tag, replacing any previous one.
    pub fn register(&mut self, adapter: Arc<dyn SourceAdapter>) {
        self.adapters.insert(adapter.tag(), adapter);
    }

    #[must_use]
    pub fn get(&self, tag: SourceTag) -> Option<Arc<dyn SourceAdapter>> {
        self.adapters.get(&tag).cloned()
    }

    #[must_use]
    pub fn tags(&self) -> Vec<SourceTag> {
        self.adapters.keys().copied().collect()
    }

    /// All four production adapters, wired from `config`.
    ///
    /// Browser-driven features are unavailable when no WebDriver endpoint
    /// is configured; those adapters then log and return no data.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if an HTTP client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, SourceError> {
        let fetcher = PageFetcher::new(&FetchSettings::from_config(config))?;
        let browser: Option<Arc<dyn BrowserLauncher>> = match config.webdriver_url.as_deref() {
            Some(endpoint) => Some(Arc::new(WebDriverLauncher::new(
                endpoint,
                &config.user_agent,
                config.fetch_timeout_secs,
            )?)),
            None => {
                tracing::info!("no WebDriver endpoint configured; browser-based reads disabled");
                None
            }
        };
        let wait = Duration::from_secs(config.browser_wait_secs);

        let mut registry = Self::new();
        registry.register(Arc::new(TencentAdapter::new(fetcher.clone())));
        registry.register(Arc::new(ToutiaoAdapter::new(
            fetcher.clone(),
            browser.clone(),
            wait,
        )));
        registry.register(Arc::new(WeixinAdapter::new(fetcher, browser.clone(), wait)));
        registry.register(Arc::new(WeiboAdapter::new(browser, wait)));
        Ok(registry)
    }
}
