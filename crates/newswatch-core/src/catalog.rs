//! Reference collections: tracked keywords and configured platforms.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::records::SourceTag;
use crate::time::local_time;

/// Category assigned when a keyword is added without one.
pub const DEFAULT_CATEGORY: &str = "default";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Active => write!(f, "active"),
            Status::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Status::Active),
            "inactive" => Ok(Status::Inactive),
            other => Err(format!("invalid status '{other}'; expected active or inactive")),
        }
    }
}

/// A tracked keyword. `name` is unique within the collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Keyword {
    pub name: String,
    pub category: String,
    pub status: Status,
    #[serde(with = "local_time")]
    pub created_at: NaiveDateTime,
    #[serde(with = "local_time")]
    pub updated_at: NaiveDateTime,
}

impl Keyword {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// A configured source platform. `name` is unique; `id` is a display handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Platform {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: SourceTag,
    pub status: Status,
    #[serde(with = "local_time")]
    pub created_at: NaiveDateTime,
}

impl Platform {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}
