//! Narrative summary of a trend report.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::distribution::SentimentCounts;
use crate::heat::TrendDirection;

fn heat_assessment(rate_24h: f64) -> &'static str {
    if rate_24h > 50.0 {
        "high, drawing wide attention"
    } else if rate_24h > 20.0 {
        "moderate, with some attention"
    } else {
        "low, with limited attention"
    }
}

fn day_outlook(rate_24h: f64) -> &'static str {
    if rate_24h > 50.0 {
        "heat rose sharply over the last 24 hours and needs close watching"
    } else if rate_24h > 20.0 {
        "heat rose noticeably over the last 24 hours"
    } else if rate_24h > -20.0 {
        "heat held steady over the last 24 hours"
    } else if rate_24h > -50.0 {
        "heat fell noticeably over the last 24 hours"
    } else {
        "heat fell sharply over the last 24 hours and the topic may be winding down"
    }
}

fn discussion_assessment(total: usize) -> &'static str {
    if total > 100 {
        "very high, with lively discussion"
    } else if total > 50 {
        "fairly high, with plenty of discussion"
    } else {
        "ordinary, with limited discussion"
    }
}

fn sentiment_tendency(s: SentimentCounts) -> &'static str {
    if s.positive > s.negative * 2 {
        "clearly positive, with favourable coverage dominating"
    } else if s.negative > s.positive * 2 {
        "clearly negative, with many critical voices"
    } else if s.positive > s.negative {
        "leaning positive, with some negative voices"
    } else if s.negative > s.positive {
        "leaning negative, with some positive voices"
    } else {
        "neutral, with positive and negative coverage in balance"
    }
}

fn trend_advice(direction: TrendDirection) -> &'static str {
    if direction.is_rising() {
        "Heat is rising: monitor closely and follow new developments promptly."
    } else if direction.is_falling() {
        "Heat is falling: monitoring frequency can be reduced."
    } else {
        "Keep routine monitoring and watch for new developments."
    }
}

fn sentiment_advice(s: SentimentCounts) -> &'static str {
    if s.negative > s.positive {
        "Negative sentiment dominates: track critical coverage and prepare responses."
    } else if s.positive > s.negative * 2 {
        "Positive coverage dominates: consider amplifying it."
    } else {
        "Sentiment is balanced: watch for shifts."
    }
}

/// Platform with the most records; ties go to the first name in order.
fn leading_platform(platforms: &BTreeMap<String, usize>) -> Option<&str> {
    platforms
        .iter()
        .fold(None, |best: Option<(&String, usize)>, (name, &count)| match best {
            Some((_, top)) if top >= count => best,
            _ => Some((name, count)),
        })
        .map(|(name, _)| name.as_str())
}

/// Human-readable conclusion. Same inputs, same text.
#[must_use]
pub fn generate_conclusion(
    keyword: &str,
    direction: TrendDirection,
    rate_24h: f64,
    sentiment: SentimentCounts,
    platforms: &BTreeMap<String, usize>,
) -> String {
    let platform_advice = match leading_platform(platforms) {
        Some(name) => format!("Focus on discussion on {name}, where coverage is concentrated."),
        None => "Follow discussion on the key platforms to read the direction of opinion."
            .to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "Analysis of keyword '{keyword}':");
    let _ = writeln!(out);
    let _ = writeln!(out, "1. Heat: {}.", heat_assessment(rate_24h));
    let _ = writeln!(
        out,
        "2. Trend: {direction} ({rate_24h:+.2}%); {}.",
        day_outlook(rate_24h)
    );
    let _ = writeln!(
        out,
        "3. Discussion: {}.",
        discussion_assessment(sentiment.total())
    );
    let _ = writeln!(out, "4. Sentiment: {}.", sentiment_tendency(sentiment));
    let _ = writeln!(out, "5. Suggestions:");
    let _ = writeln!(out, "- {}", trend_advice(direction));
    let _ = writeln!(out, "- {platform_advice}");
    let _ = writeln!(out, "- {}", sentiment_advice(sentiment));
    out
}
