use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::records::SourceTag;
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSeed {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformSeed {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: SourceTag,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub keywords: Vec<KeywordSeed>,
    #[serde(default)]
    pub platforms: Vec<PlatformSeed>,
}

/// Load and validate the keyword/platform seed from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let seed: SeedFile = serde_yaml::from_str(&content)?;
    validate_seed(&seed)?;

    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    let mut seen_keywords = HashSet::new();
    for keyword in &seed.keywords {
        if keyword.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "keyword name must be non-empty".to_string(),
            ));
        }
        if !seen_keywords.insert(keyword.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate keyword: '{}'",
                keyword.name
            )));
        }
    }

    let mut seen_platforms = HashSet::new();
    for platform in &seed.platforms {
        if platform.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "platform name must be non-empty".to_string(),
            ));
        }
        if !seen_platforms.insert(platform.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform name: '{}'",
                platform.name
            )));
        }
    }

    Ok(())
}
