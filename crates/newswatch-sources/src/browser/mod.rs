//! Scripted-browser capability for sources that render client-side.
//!
//! Adapters depend only on [`BrowserLauncher`] and [`BrowserSession`], so
//! a WebDriver endpoint ([`WebDriverLauncher`]) can be swapped for an
//! in-memory fake in tests.

mod webdriver;

#[cfg(test)]
pub(crate) mod fake;

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::SourceError;

pub use webdriver::{WebDriverLauncher, WebDriverSession};

/// Interval between selector probes in [`BrowserSession::wait_for`].
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Opaque handle to an element inside one session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), SourceError>;

    /// Elements matching `css`, searched under `scope` or the whole page.
    async fn find_all(
        &self,
        scope: Option<&ElementId>,
        css: &str,
    ) -> Result<Vec<ElementId>, SourceError>;

    async fn text(&self, element: &ElementId) -> Result<String, SourceError>;

    async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, SourceError>;

    /// End the session. The session must not be used afterwards.
    async fn close(&self) -> Result<(), SourceError>;

    /// Poll until `css` matches at least one element.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Timeout`] when nothing matched within
    /// `timeout`, or the first error of a probe.
    async fn wait_for(&self, css: &str, timeout: Duration) -> Result<(), SourceError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if !self.find_all(None, css).await?.is_empty() {
                return Ok(());
            }
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(SourceError::Timeout {
                    what: format!("selector `{css}`"),
                    secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(WAIT_POLL_INTERVAL.min(deadline - now)).await;
        }
    }
}

/// Starts browser sessions. One session is opened per adapter call and
/// closed before the call returns.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SourceError>;
}

/// Trimmed text of the first element matching `css`, if any and non-empty.
pub(crate) async fn first_text(
    session: &dyn BrowserSession,
    scope: Option<&ElementId>,
    css: &str,
) -> Result<Option<String>, SourceError> {
    let Some(element) = session.find_all(scope, css).await?.into_iter().next() else {
        return Ok(None);
    };
    let text = session.text(&element).await?;
    let text = text.trim();
    Ok((!text.is_empty()).then(|| text.to_owned()))
}

/// Non-empty trimmed texts of every element matching `css`.
pub(crate) async fn all_texts(
    session: &dyn BrowserSession,
    scope: Option<&ElementId>,
    css: &str,
) -> Result<Vec<String>, SourceError> {
    let mut texts = Vec::new();
    for element in session.find_all(scope, css).await? {
        let text = session.text(&element).await?;
        let text = text.trim();
        if !text.is_empty() {
            texts.push(text.to_owned());
        }
    }
    Ok(texts)
}

/// Attribute `name` of the first element matching `css`.
pub(crate) async fn first_attribute(
    session: &dyn BrowserSession,
    scope: Option<&ElementId>,
    css: &str,
    name: &str,
) -> Result<Option<String>, SourceError> {
    match session.find_all(scope, css).await?.into_iter().next() {
        Some(element) => session.attribute(&element, name).await,
        None => Ok(None),
    }
}

/// An open session that is ended on every exit path.
///
/// [`SessionGuard::close`] ends it in place. If the guard is dropped first
/// (the owning future was cancelled by a timeout), the close is handed to
/// the runtime so the remote browser does not outlive the task.
pub(crate) struct SessionGuard {
    session: Arc<dyn BrowserSession>,
    closed: bool,
}

impl SessionGuard {
    pub(crate) async fn open(launcher: &dyn BrowserLauncher) -> Result<Self, SourceError> {
        let session = launcher.open().await?;
        Ok(Self {
            session: Arc::from(session),
            closed: false,
        })
    }

    pub(crate) async fn close(mut self) {
        self.closed = true;
        close_quietly(self.session.as_ref()).await;
    }
}

impl Deref for SessionGuard {
    type Target = dyn BrowserSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        let session = Arc::clone(&self.session);
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                tracing::debug!("browser task cancelled, closing its session");
                runtime.spawn(async move { close_quietly(session.as_ref()).await });
            }
            Err(_) => tracing::warn!("browser session dropped outside a runtime, left open"),
        }
    }
}

async fn close_quietly(session: &dyn BrowserSession) {
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
}
