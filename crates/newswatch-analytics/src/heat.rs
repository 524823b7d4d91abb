//! Rolling-window heat counts and trend classification.

use chrono::{Duration, NaiveDateTime};
use newswatch_core::ContentRecord;
use serde::Serialize;

/// Five-valued classification of the 24-hour change rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    #[serde(rename = "significant rise")]
    SignificantRise,
    #[serde(rename = "slow rise")]
    SlowRise,
    #[serde(rename = "significant fall")]
    SignificantFall,
    #[serde(rename = "slow fall")]
    SlowFall,
    #[default]
    #[serde(rename = "stable")]
    Stable,
}

impl TrendDirection {
    /// Classify a percentage change rate. Thresholds are strict: exactly
    /// `50.0` is a slow rise and exactly `-20.0` is stable.
    #[must_use]
    pub fn classify(rate: f64) -> Self {
        if rate > 50.0 {
            Self::SignificantRise
        } else if rate > 20.0 {
            Self::SlowRise
        } else if rate < -50.0 {
            Self::SignificantFall
        } else if rate < -20.0 {
            Self::SlowFall
        } else {
            Self::Stable
        }
    }

    #[must_use]
    pub fn is_rising(self) -> bool {
        matches!(self, Self::SignificantRise | Self::SlowRise)
    }

    #[must_use]
    pub fn is_falling(self) -> bool {
        matches!(self, Self::SignificantFall | Self::SlowFall)
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::SignificantRise => "significant rise",
            Self::SlowRise => "slow rise",
            Self::SignificantFall => "significant fall",
            Self::SlowFall => "slow fall",
            Self::Stable => "stable",
        })
    }
}

/// Record counts per rolling window, relative to a reference instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowCounts {
    /// Age in `[0, 24h]`.
    pub last_24h: usize,
    /// Age in `(24h, 48h]`.
    pub prior_24h: usize,
    /// Age in `[0, 7d]`.
    pub last_7d: usize,
    /// Age in `(7d, 14d]`.
    pub prior_7d: usize,
}

impl WindowCounts {
    /// Bucket `records` by `now - publish_time`.
    ///
    /// Records published after `now` fall in no window. Records whose
    /// publish time does not parse are skipped.
    #[must_use]
    pub fn tally(records: &[ContentRecord], now: NaiveDateTime) -> Self {
        let day = Duration::hours(24);
        let week = Duration::days(7);
        let mut counts = Self::default();

        for record in records {
            let Some(published) = record.published_at() else {
                tracing::debug!(
                    url = %record.url,
                    publish_time = %record.publish_time,
                    "publish time unparseable, excluded from heat windows"
                );
                continue;
            };
            let age = now - published;
            if age < Duration::zero() {
                continue;
            }
            if age <= day {
                counts.last_24h += 1;
            } else if age <= day * 2 {
                counts.prior_24h += 1;
            }
            if age <= week {
                counts.last_7d += 1;
            } else if age <= week * 2 {
                counts.prior_7d += 1;
            }
        }
        counts
    }
}

/// Window-over-window change, as reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatChange {
    pub count_24h: usize,
    pub prior_count_24h: usize,
    pub change_24h: i64,
    /// Percent, rounded to two decimals.
    pub rate_24h: f64,
    pub count_7d: usize,
    pub prior_count_7d: usize,
    pub change_7d: i64,
    pub rate_7d: f64,
    pub trend_direction: TrendDirection,
}

impl HeatChange {
    /// Change metrics over `counts`. The trend is classified on the
    /// unrounded 24h rate.
    #[must_use]
    pub fn from_counts(counts: WindowCounts) -> Self {
        let (change_24h, rate_24h) = change_and_rate(counts.last_24h, counts.prior_24h);
        let (change_7d, rate_7d) = change_and_rate(counts.last_7d, counts.prior_7d);
        Self {
            count_24h: counts.last_24h,
            prior_count_24h: counts.prior_24h,
            change_24h,
            rate_24h: round2(rate_24h),
            count_7d: counts.last_7d,
            prior_count_7d: counts.prior_7d,
            change_7d,
            rate_7d: round2(rate_7d),
            trend_direction: TrendDirection::classify(rate_24h),
        }
    }

    #[must_use]
    pub fn compute(records: &[ContentRecord], now: NaiveDateTime) -> Self {
        Self::from_counts(WindowCounts::tally(records, now))
    }
}

/// `current - prior` and its percentage of `prior`; the rate is `0.0` when
/// `prior` is zero.
#[must_use]
pub fn change_and_rate(current: usize, prior: usize) -> (i64, f64) {
    let current = i64::try_from(current).unwrap_or(i64::MAX);
    let prior_i = i64::try_from(prior).unwrap_or(i64::MAX);
    let change = current.saturating_sub(prior_i);
    if prior == 0 {
        return (change, 0.0);
    }
    #[allow(clippy::cast_precision_loss)]
    let rate = change as f64 / prior as f64 * 100.0;
    (change, rate)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
#[path = "heat_test.rs"]
mod tests;
