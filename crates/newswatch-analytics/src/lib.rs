//! Heat and trend analysis over stored records.
//!
//! Rolling-window counts and change rates, trend classification, origin
//! detection, distributions and a narrative conclusion, bundled into a
//! [`TrendReport`]. Everything is computed from records read back from the
//! [`newswatch_store::RecordStore`] against a caller-supplied "now".

pub mod conclusion;
pub mod distribution;
pub mod heat;
pub mod origin;
pub mod report;

pub use conclusion::generate_conclusion;
pub use distribution::SentimentCounts;
pub use heat::{HeatChange, TrendDirection, WindowCounts};
pub use origin::{analyze_origin, OriginAnalysis};
pub use report::{analyze_records, DashboardStats, TrendAnalyzer, TrendReport, MAX_REPORT_DAYS};
