//! Sentiment label counts.

use newswatch_core::{ContentRecord, Sentiment};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentCounts {
    /// Count the stored labels of `records`.
    #[must_use]
    pub fn tally(records: &[ContentRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.sentiment {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Negative => counts.negative += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}
