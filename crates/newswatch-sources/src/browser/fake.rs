//! In-memory browser serving canned HTML pages, for adapter tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};

use super::{BrowserLauncher, BrowserSession, ElementId};
use crate::error::SourceError;
use crate::markup::element_text;

#[derive(Debug, Default)]
pub(crate) struct FakeBrowser {
    pages: Arc<HashMap<String, String>>,
    pub(crate) opened: Arc<AtomicUsize>,
    pub(crate) closed: Arc<AtomicUsize>,
    refuse_sessions: bool,
}

impl FakeBrowser {
    pub(crate) fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: Arc::new(
                pages
                    .iter()
                    .map(|(url, html)| ((*url).to_owned(), (*html).to_owned()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub(crate) fn refusing() -> Self {
        Self {
            refuse_sessions: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl BrowserLauncher for FakeBrowser {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SourceError> {
        if self.refuse_sessions {
            return Err(SourceError::Browser("session not created".to_owned()));
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            pages: Arc::clone(&self.pages),
            closed: Arc::clone(&self.closed),
            current: Mutex::new(None),
            handles: Mutex::new(Vec::new()),
        }))
    }
}

/// `index`-th match of `css` under handle `parent` (or the document).
#[derive(Debug, Clone)]
struct Handle {
    parent: Option<usize>,
    css: String,
    index: usize,
}

struct FakeSession {
    pages: Arc<HashMap<String, String>>,
    closed: Arc<AtomicUsize>,
    current: Mutex<Option<String>>,
    handles: Mutex<Vec<Handle>>,
}

fn parse_selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Browser(format!("invalid selector: {e}")))
}

fn resolve<'a>(doc: &'a Html, handles: &[Handle], id: usize) -> Option<ElementRef<'a>> {
    let handle = handles.get(id)?;
    let sel = Selector::parse(&handle.css).ok()?;
    match handle.parent {
        Some(parent) => resolve(doc, handles, parent)?.select(&sel).nth(handle.index),
        None => doc.select(&sel).nth(handle.index),
    }
}

fn handle_index(element: &ElementId) -> Result<usize, SourceError> {
    element
        .0
        .parse()
        .map_err(|_| SourceError::Browser(format!("stale element {}", element.0)))
}

impl FakeSession {
    fn document(&self) -> Result<Html, SourceError> {
        let current = self.current.lock().unwrap();
        let html = current
            .as_ref()
            .ok_or_else(|| SourceError::Browser("no page loaded".to_owned()))?;
        Ok(Html::parse_document(html))
    }

    fn with_element<T>(
        &self,
        element: &ElementId,
        f: impl FnOnce(ElementRef<'_>) -> T,
    ) -> Result<T, SourceError> {
        let id = handle_index(element)?;
        let doc = self.document()?;
        let handles = self.handles.lock().unwrap();
        resolve(&doc, &handles, id)
            .map(f)
            .ok_or_else(|| SourceError::Browser(format!("stale element {id}")))
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str) -> Result<(), SourceError> {
        let html = self
            .pages
            .get(url)
            .cloned()
            .unwrap_or_else(|| "<html><body></body></html>".to_owned());
        *self.current.lock().unwrap() = Some(html);
        self.handles.lock().unwrap().clear();
        Ok(())
    }

    async fn find_all(
        &self,
        scope: Option<&ElementId>,
        css: &str,
    ) -> Result<Vec<ElementId>, SourceError> {
        let sel = parse_selector(css)?;
        let parent = scope.map(handle_index).transpose()?;
        let doc = self.document()?;
        let mut handles = self.handles.lock().unwrap();

        let count = match parent {
            Some(p) => resolve(&doc, &handles, p)
                .map_or(0, |el| el.select(&sel).count()),
            None => doc.select(&sel).count(),
        };

        let first = handles.len();
        handles.extend((0..count).map(|index| Handle {
            parent,
            css: css.to_owned(),
            index,
        }));
        Ok((first..first + count)
            .map(|id| ElementId(id.to_string()))
            .collect())
    }

    async fn text(&self, element: &ElementId) -> Result<String, SourceError> {
        self.with_element(element, element_text)
    }

    async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, SourceError> {
        self.with_element(element, |el| el.value().attr(name).map(str::to_owned))
    }

    async fn close(&self) -> Result<(), SourceError> {
        self.closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::browser::{all_texts, first_attribute, first_text};

    const PAGE: &str = r#"
        <div class="card"><a class="t" href="/a">A</a><span>1</span></div>
        <div class="card"><a class="t" href="/b">B</a><span>2</span></div>
    "#;

    #[tokio::test]
    async fn scoped_lookups_resolve_within_their_parent() {
        let browser = FakeBrowser::with_pages(&[("https://x/", PAGE)]);
        let session = browser.open().await.unwrap();
        session.navigate("https://x/").await.unwrap();

        let cards = session.find_all(None, ".card").await.unwrap();
        assert_eq!(cards.len(), 2);
        let second = &cards[1];
        assert_eq!(
            first_text(&*session, Some(second), "a.t").await.unwrap().as_deref(),
            Some("B")
        );
        assert_eq!(
            first_attribute(&*session, Some(second), "a.t", "href")
                .await
                .unwrap()
                .as_deref(),
            Some("/b")
        );
        assert_eq!(all_texts(&*session, None, "span").await.unwrap(), ["1", "2"]);
    }

    #[tokio::test]
    async fn wait_for_times_out_on_missing_selector() {
        let browser = FakeBrowser::with_pages(&[("https://x/", PAGE)]);
        let session = browser.open().await.unwrap();
        session.navigate("https://x/").await.unwrap();

        session
            .wait_for(".card", Duration::from_millis(10))
            .await
            .unwrap();
        let err = session
            .wait_for(".missing", Duration::from_millis(10))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Timeout { .. }));
    }
}
