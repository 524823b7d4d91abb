//! Shared data model and configuration for the newswatch workspace.
//!
//! Every other crate speaks in terms of the types defined here: the
//! normalized [`ContentRecord`], the two reference collections
//! ([`Keyword`], [`Platform`]) and the [`SourceTag`] naming each external
//! source.

pub mod app_config;
pub mod catalog;
pub mod config;
pub mod records;
pub mod seed;
pub mod time;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use catalog::{Keyword, Platform, Status, DEFAULT_CATEGORY};
pub use config::{load_app_config, load_app_config_from_env};
pub use records::{ContentRecord, Sentiment, SourceTag};
pub use seed::{load_seed, KeywordSeed, PlatformSeed, SeedFile};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read seed file {path}: {source}")]
    SeedFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file: {0}")]
    SeedFileParse(#[from] serde_yaml::Error),

    #[error("seed validation failed: {0}")]
    Validation(String),
}
