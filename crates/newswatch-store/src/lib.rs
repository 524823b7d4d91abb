//! JSON-document record store for newswatch.
//!
//! Each collection (`news_data`, `keywords`, `platforms`, ...) is a single
//! pretty-printed JSON array on disk. Every mutation loads the whole
//! collection, edits it in memory and rewrites it, so writes are O(n) in the
//! collection size. Mutations on the same collection are serialized by a
//! per-collection async mutex; reads take no lock and observe whichever
//! complete document is on disk (writes land via rename).

pub mod aggregate;
pub mod document;
mod keywords;
mod locks;
mod platforms;
mod queries;
mod records;
mod store;

use thiserror::Error;

pub use aggregate::{HotRecord, InteractionTotals};
pub use document::DocumentStore;
pub use records::SaveSummary;
pub use store::RecordStore;

/// Collection holding ingested [`newswatch_core::ContentRecord`]s.
pub const NEWS_COLLECTION: &str = "news_data";
/// Collection holding [`newswatch_core::Keyword`]s.
pub const KEYWORDS_COLLECTION: &str = "keywords";
/// Collection holding [`newswatch_core::Platform`]s.
pub const PLATFORMS_COLLECTION: &str = "platforms";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on collection {collection}: {source}")]
    Io {
        collection: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document for collection {collection}: {source}")]
    Malformed {
        collection: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{collection} already contains '{key}'")]
    Duplicate { collection: String, key: String },

    #[error("{collection} has no entry matching '{key}'")]
    NotFound { collection: String, key: String },

    #[error("invalid input: {0}")]
    Invalid(String),
}
