//! Minimal W3C WebDriver client over `reqwest`.
//!
//! Covers just the commands the adapters use: new session, navigate, find
//! elements (page or element scoped), element text, element attribute and
//! delete session.

use std::time::Duration;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{BrowserLauncher, BrowserSession, ElementId};
use crate::error::SourceError;

/// Key under which W3C WebDriver returns element references.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    value: T,
}

#[derive(Debug, Deserialize)]
struct NewSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Debug, Deserialize)]
struct DriverError {
    error: String,
    #[serde(default)]
    message: String,
}

/// Send one WebDriver command and unwrap its `value`.
async fn command<T>(
    client: &Client,
    method: Method,
    url: &str,
    body: Option<Value>,
) -> Result<T, SourceError>
where
    T: DeserializeOwned,
{
    let mut request = client.request(method, url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let reason = serde_json::from_str::<Envelope<DriverError>>(&text).map_or_else(
            |_| format!("HTTP {} from {url}", status.as_u16()),
            |e| format!("{}: {}", e.value.error, e.value.message),
        );
        return Err(SourceError::Browser(reason));
    }

    serde_json::from_str::<Envelope<T>>(&text)
        .map(|e| e.value)
        .map_err(|e| SourceError::Parse {
            context: format!("WebDriver response from {url}"),
            reason: e.to_string(),
        })
}

/// Opens headless Chrome sessions on a WebDriver endpoint.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    client: Client,
    endpoint: String,
    user_agent: String,
}

impl WebDriverLauncher {
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        user_agent: &str,
        request_timeout_secs: u64,
    ) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            user_agent: user_agent.to_owned(),
        })
    }

    fn capabilities(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": {
                        "args": [
                            "--headless",
                            "--no-sandbox",
                            "--disable-dev-shm-usage",
                            "--disable-gpu",
                            format!("user-agent={}", self.user_agent),
                        ]
                    }
                }
            }
        })
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn open(&self) -> Result<Box<dyn BrowserSession>, SourceError> {
        let url = format!("{}/session", self.endpoint);
        let session: NewSession =
            command(&self.client, Method::POST, &url, Some(self.capabilities())).await?;
        tracing::debug!(session_id = %session.session_id, "browser session opened");
        Ok(Box::new(WebDriverSession {
            client: self.client.clone(),
            base: format!("{url}/{}", session.session_id),
        }))
    }
}

/// One live WebDriver session.
#[derive(Debug)]
pub struct WebDriverSession {
    client: Client,
    base: String,
}

impl WebDriverSession {
    fn element_url(&self, element: &ElementId, suffix: &str) -> String {
        format!("{}/element/{}/{suffix}", self.base, element.0)
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), SourceError> {
        let _: Value = command(
            &self.client,
            Method::POST,
            &format!("{}/url", self.base),
            Some(json!({ "url": url })),
        )
        .await?;
        Ok(())
    }

    async fn find_all(
        &self,
        scope: Option<&ElementId>,
        css: &str,
    ) -> Result<Vec<ElementId>, SourceError> {
        let url = match scope {
            Some(element) => self.element_url(element, "elements"),
            None => format!("{}/elements", self.base),
        };
        let found: Vec<serde_json::Map<String, Value>> = command(
            &self.client,
            Method::POST,
            &url,
            Some(json!({ "using": "css selector", "value": css })),
        )
        .await?;

        Ok(found
            .into_iter()
            .filter_map(|mut reference| match reference.remove(ELEMENT_KEY) {
                Some(Value::String(id)) => Some(ElementId(id)),
                _ => None,
            })
            .collect())
    }

    async fn text(&self, element: &ElementId) -> Result<String, SourceError> {
        command(
            &self.client,
            Method::GET,
            &self.element_url(element, "text"),
            None,
        )
        .await
    }

    async fn attribute(
        &self,
        element: &ElementId,
        name: &str,
    ) -> Result<Option<String>, SourceError> {
        let suffix = format!(
            "attribute/{}",
            utf8_percent_encode(name, NON_ALPHANUMERIC)
        );
        command(
            &self.client,
            Method::GET,
            &self.element_url(element, &suffix),
            None,
        )
        .await
    }

    async fn close(&self) -> Result<(), SourceError> {
        let _: Value = command(&self.client, Method::DELETE, &self.base, None).await?;
        tracing::debug!(session = %self.base, "browser session closed");
        Ok(())
    }
}
