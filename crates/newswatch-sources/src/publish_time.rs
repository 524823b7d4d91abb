//! Best-effort normalization of source publish times.
//!
//! Sources print publish times in a handful of absolute and relative
//! shapes. Recognised shapes are rewritten to `YYYY-MM-DD HH:MM:SS`
//! relative to the crawl instant; anything else is returned trimmed but
//! otherwise verbatim so no information is lost.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use newswatch_core::time::format_timestamp;
use regex::{Captures, Regex};

static ISO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})[-/.](\d{1,2})[-/.](\d{1,2})(?:\s+(\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("valid regex")
});
static CN_FULL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})年(\d{1,2})月(\d{1,2})日\s*(?:(\d{1,2}):(\d{2})(?::(\d{2}))?)?$")
        .expect("valid regex")
});
static CN_MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})月(\d{1,2})日\s*(?:(\d{1,2}):(\d{2}))?$").expect("valid regex")
});
static CN_AGO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*(秒|分钟|小时|天)前$").expect("valid regex"));
static EN_AGO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s*(second|minute|min|hour|hr|day)s?\s+ago$").expect("valid regex")
});
static DAY_CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(今天|昨天)\s*(\d{1,2}):(\d{2})$").expect("valid regex"));
static EPOCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"timeConvert\('(\d{9,11})'\)").expect("valid regex"));

fn num<T: std::str::FromStr>(caps: &Captures<'_>, i: usize) -> Option<T> {
    caps.get(i).and_then(|m| m.as_str().parse().ok())
}

fn clock(caps: &Captures<'_>, h: usize, m: usize, s: usize) -> Option<NaiveTime> {
    if caps.get(h).is_none() {
        return Some(NaiveTime::MIN);
    }
    NaiveTime::from_hms_opt(num(caps, h)?, num(caps, m)?, num(caps, s).unwrap_or(0))
}

fn absolute(raw: &str, crawl_time: NaiveDateTime) -> Option<NaiveDateTime> {
    if let Some(caps) = ISO_RE.captures(raw).or_else(|| CN_FULL_RE.captures(raw)) {
        let date = NaiveDate::from_ymd_opt(num(&caps, 1)?, num(&caps, 2)?, num(&caps, 3)?)?;
        return Some(date.and_time(clock(&caps, 4, 5, 6)?));
    }

    if let Some(caps) = CN_MONTH_DAY_RE.captures(raw) {
        let (month, day) = (num(&caps, 1)?, num(&caps, 2)?);
        let time = clock(&caps, 3, 4, 5)?;
        let year = crawl_time.year();
        let stamp = NaiveDate::from_ymd_opt(year, month, day)?.and_time(time);
        // Month-day stamps omit the year; a date after the crawl is last year's.
        if stamp > crawl_time {
            return Some(NaiveDate::from_ymd_opt(year - 1, month, day)?.and_time(time));
        }
        return Some(stamp);
    }
    None
}

fn relative(raw: &str, crawl_time: NaiveDateTime) -> Option<NaiveDateTime> {
    if raw == "刚刚" || raw.eq_ignore_ascii_case("just now") {
        return Some(crawl_time);
    }

    if let Some(caps) = CN_AGO_RE.captures(raw).or_else(|| EN_AGO_RE.captures(raw)) {
        let n: i64 = num(&caps, 1)?;
        let offset = match caps.get(2)?.as_str().to_ascii_lowercase().as_str() {
            "秒" | "second" => Duration::try_seconds(n)?,
            "分钟" | "minute" | "min" => Duration::try_minutes(n)?,
            "小时" | "hour" | "hr" => Duration::try_hours(n)?,
            "天" | "day" => Duration::try_days(n)?,
            _ => return None,
        };
        return crawl_time.checked_sub_signed(offset);
    }

    if let Some(caps) = DAY_CLOCK_RE.captures(raw) {
        let time = NaiveTime::from_hms_opt(num(&caps, 2)?, num(&caps, 3)?, 0)?;
        let date = match caps.get(1)?.as_str() {
            "昨天" => crawl_time.date().pred_opt()?,
            _ => crawl_time.date(),
        };
        return Some(date.and_time(time));
    }

    if let Some(caps) = EPOCH_RE.captures(raw) {
        let secs: i64 = num(&caps, 1)?;
        let utc = DateTime::from_timestamp(secs, 0)?;
        return Some(utc.with_timezone(&Local).naive_local());
    }
    None
}

/// Normalize a scraped publish time against `crawl_time`.
///
/// Returns the canonical form for recognised shapes, the trimmed input
/// otherwise, and an empty string for blank input.
#[must_use]
pub fn normalize_publish_time(raw: &str, crawl_time: NaiveDateTime) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    match absolute(raw, crawl_time).or_else(|| relative(raw, crawl_time)) {
        Some(ts) => format_timestamp(ts),
        None => {
            tracing::debug!(raw, "publish time not recognised, kept verbatim");
            raw.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crawl() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    fn norm(raw: &str) -> String {
        normalize_publish_time(raw, crawl())
    }

    #[test]
    fn absolute_forms() {
        assert_eq!(norm("2024-05-01 08:15:30"), "2024-05-01 08:15:30");
        assert_eq!(norm("2024-05-01 08:15"), "2024-05-01 08:15:00");
        assert_eq!(norm("2024-5-1"), "2024-05-01 00:00:00");
        assert_eq!(norm("2024/05/01"), "2024-05-01 00:00:00");
        assert_eq!(norm("2024年05月01日 08:15"), "2024-05-01 08:15:00");
        assert_eq!(norm("05月03日 10:00"), "2024-05-03 10:00:00");
    }

    #[test]
    fn month_day_after_crawl_belongs_to_previous_year() {
        assert_eq!(norm("12月31日 23:00"), "2023-12-31 23:00:00");
    }

    #[test]
    fn relative_forms() {
        assert_eq!(norm("刚刚"), "2024-05-10 12:30:00");
        assert_eq!(norm("5分钟前"), "2024-05-10 12:25:00");
        assert_eq!(norm("3小时前"), "2024-05-10 09:30:00");
        assert_eq!(norm("2天前"), "2024-05-08 12:30:00");
        assert_eq!(norm("今天 08:05"), "2024-05-10 08:05:00");
        assert_eq!(norm("昨天 23:59"), "2024-05-09 23:59:00");
        assert_eq!(norm("2 hours ago"), "2024-05-10 10:30:00");
        assert_eq!(norm("1 day ago"), "2024-05-09 12:30:00");
    }

    #[test]
    fn unrecognised_text_is_kept() {
        assert_eq!(norm("  last spring "), "last spring");
        assert_eq!(norm("2024-13-45"), "2024-13-45");
        assert_eq!(norm(""), "");
    }

    #[test]
    fn epoch_script_is_converted() {
        let out = norm("document.write(timeConvert('1715300000'))");
        assert!(newswatch_core::time::parse_timestamp(&out).is_some(), "{out}");
    }
}
