use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub data_dir: PathBuf,
    pub log_level: String,
    pub seed_path: PathBuf,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub max_concurrent_sources: usize,
    pub source_task_timeout_secs: u64,
    pub webdriver_url: Option<String>,
    pub browser_wait_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("data_dir", &self.data_dir)
            .field("log_level", &self.log_level)
            .field("seed_path", &self.seed_path)
            .field("fetch_timeout_secs", &self.fetch_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("max_concurrent_sources", &self.max_concurrent_sources)
            .field("source_task_timeout_secs", &self.source_task_timeout_secs)
            .field(
                "webdriver_url",
                &self.webdriver_url.as_deref().map(redact_userinfo),
            )
            .field("browser_wait_secs", &self.browser_wait_secs)
            .finish()
    }
}

/// Hide `user:pass@` credentials embedded in an endpoint URL.
fn redact_userinfo(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.split_once('@') {
        Some((_, host)) => format!("{scheme}://[redacted]@{host}"),
        None => url.to_string(),
    }
}
