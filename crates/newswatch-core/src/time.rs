//! Canonical timestamp format shared by stored documents and analytics.
//!
//! All timestamps are local wall-clock times rendered as
//! `YYYY-MM-DD HH:MM:SS`. Publish times arrive from sources as free text
//! and are only normalized on a best-effort basis, so they are stored as
//! strings and parsed on read with [`parse_timestamp`].

use chrono::{NaiveDate, NaiveDateTime};

/// `strftime` pattern for every stored timestamp.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// `strftime` pattern for calendar-day buckets.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a timestamp in [`TIME_FORMAT`]. Surrounding whitespace is ignored.
#[must_use]
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()
}

#[must_use]
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIME_FORMAT).to_string()
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` fields stored in [`TIME_FORMAT`].
pub mod local_time {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TIME_FORMAT;

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format(TIME_FORMAT).to_string())
    }

    /// # Errors
    ///
    /// Fails when the value is not a string in `YYYY-MM-DD HH:MM:SS` form.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIME_FORMAT).map_err(serde::de::Error::custom)
    }
}
