//! Lexicon sentiment labelling for ingested records.

use newswatch_core::{ContentRecord, Sentiment};

/// Scores above this are positive, below its negation negative.
pub const SENTIMENT_THRESHOLD: f32 = 0.1;

/// Whole-word English weights. Keys are lowercase.
const ENGLISH_LEXICON: &[(&str, f32)] = &[
    ("breakthrough", 0.5),
    ("growth", 0.3),
    ("growing", 0.3),
    ("record", 0.2),
    ("success", 0.4),
    ("successful", 0.4),
    ("win", 0.4),
    ("innovation", 0.4),
    ("innovative", 0.4),
    ("improve", 0.3),
    ("improved", 0.3),
    ("popular", 0.3),
    ("approved", 0.4),
    ("good", 0.3),
    ("great", 0.4),
    ("best", 0.4),
    ("crisis", -0.6),
    ("scandal", -0.6),
    ("fraud", -0.7),
    ("recall", -0.6),
    ("lawsuit", -0.5),
    ("ban", -0.5),
    ("banned", -0.5),
    ("decline", -0.4),
    ("loss", -0.4),
    ("layoffs", -0.5),
    ("accident", -0.6),
    ("failed", -0.4),
    ("failure", -0.4),
    ("bad", -0.4),
    ("worst", -0.6),
    ("warning", -0.3),
];

/// Chinese weights, matched as substrings since the text is not
/// whitespace-segmented. Terms must not contain one another.
const CHINESE_LEXICON: &[(&str, f32)] = &[
    ("突破", 0.5),
    ("增长", 0.3),
    ("创新", 0.4),
    ("成功", 0.4),
    ("利好", 0.5),
    ("领先", 0.3),
    ("点赞", 0.3),
    ("好评", 0.4),
    ("提升", 0.3),
    ("喜讯", 0.5),
    ("危机", -0.6),
    ("丑闻", -0.6),
    ("造假", -0.7),
    ("召回", -0.6),
    ("起诉", -0.5),
    ("下滑", -0.4),
    ("亏损", -0.5),
    ("裁员", -0.5),
    ("事故", -0.6),
    ("失败", -0.4),
    ("投诉", -0.4),
    ("暴跌", -0.6),
];

/// Score `text` in `[-1.0, 1.0]`; `0.0` when nothing matches.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn lexicon_score(text: &str) -> f32 {
    let mut score = 0.0_f32;

    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        if let Some(&(_, weight)) = ENGLISH_LEXICON.iter().find(|(term, _)| *term == w) {
            score += weight;
        }
    }

    for &(term, weight) in CHINESE_LEXICON {
        score += weight * text.matches(term).count() as f32;
    }

    score.clamp(-1.0, 1.0)
}

#[must_use]
pub fn classify(score: f32) -> Sentiment {
    if score > SENTIMENT_THRESHOLD {
        Sentiment::Positive
    } else if score < -SENTIMENT_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

/// Label a record from its title, summary and content.
#[must_use]
pub fn label_record(record: &ContentRecord) -> Sentiment {
    let text = format!("{} {} {}", record.title, record.summary, record.content);
    classify(lexicon_score(&text))
}
