use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Browser-like default `User-Agent` sent by the document fetcher.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Read `.env` (if any), then build [`AppConfig`] from the environment.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Build [`AppConfig`] from the process environment as it stands; no `.env`
/// file is read.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    from_lookup(&|key| std::env::var(key).ok())
}

type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn var_or(lookup: Lookup<'_>, var: &str, default: &str) -> String {
    lookup(var).unwrap_or_else(|| default.to_string())
}

fn parse_var<T>(lookup: Lookup<'_>, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Assemble the config from `lookup`, which stands in for the environment.
fn from_lookup(lookup: Lookup<'_>) -> Result<AppConfig, ConfigError> {
    let env = environment_from(&var_or(lookup, "NEWSWATCH_ENV", "development"));
    let data_dir = PathBuf::from(var_or(lookup, "NEWSWATCH_DATA_DIR", "./data"));
    let log_level = var_or(lookup, "NEWSWATCH_LOG_LEVEL", "info");
    let seed_path = PathBuf::from(var_or(lookup, "NEWSWATCH_SEED_PATH", "./config/seed.yaml"));
    let user_agent = var_or(lookup, "NEWSWATCH_USER_AGENT", DEFAULT_USER_AGENT);

    let fetch_timeout_secs = parse_var(lookup, "NEWSWATCH_FETCH_TIMEOUT_SECS", 10)?;
    let max_retries = parse_var(lookup, "NEWSWATCH_MAX_RETRIES", 2)?;
    let retry_backoff_base_secs = parse_var(lookup, "NEWSWATCH_RETRY_BACKOFF_BASE_SECS", 1)?;
    let max_concurrent_sources: usize =
        parse_var(lookup, "NEWSWATCH_MAX_CONCURRENT_SOURCES", 4)?;
    let source_task_timeout_secs = parse_var(lookup, "NEWSWATCH_SOURCE_TASK_TIMEOUT_SECS", 60)?;
    let browser_wait_secs = parse_var(lookup, "NEWSWATCH_BROWSER_WAIT_SECS", 10)?;

    if max_concurrent_sources == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_MAX_CONCURRENT_SOURCES".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let webdriver_url = lookup("NEWSWATCH_WEBDRIVER_URL")
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());
    if webdriver_url
        .as_deref()
        .is_some_and(|url| !url.starts_with("http://") && !url.starts_with("https://"))
    {
        return Err(ConfigError::InvalidEnvVar {
            var: "NEWSWATCH_WEBDRIVER_URL".to_string(),
            reason: "must be an http(s) URL".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        data_dir,
        log_level,
        seed_path,
        fetch_timeout_secs,
        user_agent,
        max_retries,
        retry_backoff_base_secs,
        max_concurrent_sources,
        source_task_timeout_secs,
        webdriver_url,
        browser_wait_secs,
    })
}

/// `production` and `test` map to their variants; anything else is
/// development.
fn environment_from(raw: &str) -> Environment {
    match raw.trim() {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let lookup = |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v).to_owned())
        };
        from_lookup(&lookup)
    }

    fn rejected_var(vars: &[(&str, &str)]) -> Option<String> {
        match config_with(vars) {
            Err(ConfigError::InvalidEnvVar { var, .. }) => Some(var),
            _ => None,
        }
    }

    #[test]
    fn environment_names() {
        assert_eq!(environment_from("production"), Environment::Production);
        assert_eq!(environment_from(" test "), Environment::Test);
        assert_eq!(environment_from("staging"), Environment::Development);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let cfg = config_with(&[]).unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.data_dir.to_str(), Some("./data"));
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.seed_path.to_str(), Some("./config/seed.yaml"));
        assert_eq!(cfg.fetch_timeout_secs, 10);
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(cfg.max_retries, 2);
        assert_eq!(cfg.retry_backoff_base_secs, 1);
        assert_eq!(cfg.max_concurrent_sources, 4);
        assert_eq!(cfg.source_task_timeout_secs, 60);
        assert!(cfg.webdriver_url.is_none());
        assert_eq!(cfg.browser_wait_secs, 10);
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config_with(&[
            ("NEWSWATCH_DATA_DIR", "/var/lib/newswatch"),
            ("NEWSWATCH_FETCH_TIMEOUT_SECS", "30"),
            ("NEWSWATCH_MAX_CONCURRENT_SOURCES", "2"),
            ("NEWSWATCH_WEBDRIVER_URL", "http://localhost:9515"),
        ])
        .unwrap();
        assert_eq!(cfg.data_dir.to_str(), Some("/var/lib/newswatch"));
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.max_concurrent_sources, 2);
        assert_eq!(cfg.webdriver_url.as_deref(), Some("http://localhost:9515"));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        assert_eq!(
            rejected_var(&[("NEWSWATCH_FETCH_TIMEOUT_SECS", "soon")]).as_deref(),
            Some("NEWSWATCH_FETCH_TIMEOUT_SECS")
        );
        assert_eq!(
            rejected_var(&[("NEWSWATCH_MAX_CONCURRENT_SOURCES", "0")]).as_deref(),
            Some("NEWSWATCH_MAX_CONCURRENT_SOURCES")
        );
        assert_eq!(
            rejected_var(&[("NEWSWATCH_WEBDRIVER_URL", "localhost:9515")]).as_deref(),
            Some("NEWSWATCH_WEBDRIVER_URL")
        );
    }

    #[test]
    fn blank_webdriver_url_is_unset() {
        let cfg = config_with(&[("NEWSWATCH_WEBDRIVER_URL", "   ")]).unwrap();
        assert!(cfg.webdriver_url.is_none());
    }
}
