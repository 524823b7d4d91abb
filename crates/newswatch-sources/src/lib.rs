//! Source adapters for newswatch.
//!
//! Each external source is a [`SourceAdapter`] variant that searches for a
//! keyword and extracts item details, normalizing everything into
//! [`newswatch_core::ContentRecord`]. Document-based sources go through the
//! retrying [`PageFetcher`]; client-rendered ones drive a
//! [`browser::BrowserSession`]. The [`Collector`] fans out over a
//! [`SourceRegistry`] with bounded concurrency.

pub mod adapters;
pub mod browser;
pub mod collector;
pub mod error;
pub mod fetch;
pub mod helpers;
mod markup;
pub mod publish_time;
pub mod registry;
mod retry;
pub mod sentiment;

pub use adapters::{
    merge_detail, SourceAdapter, TencentAdapter, ToutiaoAdapter, WeiboAdapter, WeixinAdapter,
};
pub use collector::{CollectRequest, Collection, Collector, OutcomeStatus, SourceOutcome};
pub use error::SourceError;
pub use fetch::{FetchSettings, PageFetcher};
pub use helpers::{extract_number, normalize_url};
pub use publish_time::normalize_publish_time;
pub use registry::SourceRegistry;
