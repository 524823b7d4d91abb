use chrono::{Duration, NaiveDate, NaiveDateTime};
use newswatch_core::{time, ContentRecord, SourceTag};

use super::*;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 10)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn aged(hours: i64) -> ContentRecord {
    let published = now() - Duration::hours(hours);
    let mut r = ContentRecord::new(SourceTag::Tencent, "ai", &format!("https://x/{hours}"), now());
    r.publish_time = time::format_timestamp(published);
    r
}

#[test]
fn classification_thresholds_are_strict() {
    assert_eq!(TrendDirection::classify(50.0), TrendDirection::SlowRise);
    assert_eq!(TrendDirection::classify(50.01), TrendDirection::SignificantRise);
    assert_eq!(TrendDirection::classify(20.0001), TrendDirection::SlowRise);
    assert_eq!(TrendDirection::classify(20.0), TrendDirection::Stable);
    assert_eq!(TrendDirection::classify(-20.0), TrendDirection::Stable);
    assert_eq!(TrendDirection::classify(-20.5), TrendDirection::SlowFall);
    assert_eq!(TrendDirection::classify(-50.0), TrendDirection::SlowFall);
    assert_eq!(TrendDirection::classify(-75.0), TrendDirection::SignificantFall);
}

#[test]
fn direction_serializes_as_phrase() {
    let json = serde_json::to_value(TrendDirection::SignificantFall).unwrap();
    assert_eq!(json, "significant fall");
    assert_eq!(TrendDirection::Stable.to_string(), "stable");
}

#[test]
fn zero_prior_window_gives_zero_rate() {
    let (change, rate) = change_and_rate(7, 0);
    assert_eq!(change, 7);
    assert!(rate.abs() < f64::EPSILON);
    assert!(rate.is_finite());
}

#[test]
fn negative_change_rate() {
    let (change, rate) = change_and_rate(1, 4);
    assert_eq!(change, -3);
    assert!((rate + 75.0).abs() < 1e-9);
}

#[test]
fn window_boundaries_are_inclusive_on_the_outer_edge() {
    let records = vec![
        aged(0),
        aged(24),       // last 24h
        aged(25),       // prior 24h
        aged(48),       // prior 24h
        aged(49),       // neither day window
        aged(7 * 24),   // last 7d
        aged(7 * 24 + 1),
        aged(14 * 24),  // prior 7d
        aged(14 * 24 + 1),
    ];
    let counts = WindowCounts::tally(&records, now());
    assert_eq!(counts.last_24h, 2);
    assert_eq!(counts.prior_24h, 2);
    assert_eq!(counts.last_7d, 6);
    assert_eq!(counts.prior_7d, 2);
}

#[test]
fn future_and_unparseable_records_fall_in_no_window() {
    let mut garbled = aged(1);
    garbled.publish_time = "yesterday-ish".into();
    let records = vec![aged(-2), garbled];
    assert_eq!(WindowCounts::tally(&records, now()), WindowCounts::default());
}

#[test]
fn heat_change_rounds_rates_but_classifies_unrounded() {
    let counts = WindowCounts {
        last_24h: 4,
        prior_24h: 3,
        last_7d: 10,
        prior_7d: 3,
    };
    let heat = HeatChange::from_counts(counts);
    assert_eq!(heat.change_24h, 1);
    assert!((heat.rate_24h - 33.33).abs() < 1e-9);
    assert_eq!(heat.trend_direction, TrendDirection::SlowRise);
    assert!((heat.rate_7d - 233.33).abs() < 1e-9);
}

#[test]
fn no_prior_records_is_stable() {
    let heat = HeatChange::compute(&[aged(1), aged(2)], now());
    assert_eq!(heat.count_24h, 2);
    assert_eq!(heat.trend_direction, TrendDirection::Stable);
    assert!(heat.rate_24h.abs() < f64::EPSILON);
    assert!(heat.rate_7d.abs() < f64::EPSILON);
}

#[test]
fn heat_change_serializes_camel_case() {
    let json = serde_json::to_value(HeatChange::default()).unwrap();
    assert_eq!(json["rate24h"], 0.0);
    assert_eq!(json["priorCount7d"], 0);
    assert_eq!(json["trendDirection"], "stable");
}
