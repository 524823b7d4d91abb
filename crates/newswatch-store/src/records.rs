//! Content-record persistence with url-based deduplication.

use std::collections::HashSet;

use newswatch_core::ContentRecord;
use serde::Serialize;

use crate::store::RecordStore;
use crate::{StoreError, NEWS_COLLECTION};

/// What a [`RecordStore::save_records`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummary {
    pub submitted: usize,
    pub inserted: usize,
    pub skipped: usize,
}

impl RecordStore {
    /// Persist `records`, skipping any whose `url` is already stored.
    ///
    /// Duplicates inside the batch are skipped too, so the first occurrence
    /// of a url wins. Records with a blank url have no dedup key and are
    /// skipped. Re-submitting the same batch leaves the collection
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection cannot be loaded or written;
    /// nothing is persisted in that case.
    pub async fn save_records(&self, records: &[ContentRecord]) -> Result<SaveSummary, StoreError> {
        let summary = self
            .mutate(NEWS_COLLECTION, |existing: &mut Vec<ContentRecord>| {
                let mut seen: HashSet<String> = existing.iter().map(|r| r.url.clone()).collect();
                let mut inserted = 0usize;

                for record in records {
                    if record.url.trim().is_empty() {
                        tracing::debug!(title = %record.title, "skipping record without url");
                        continue;
                    }
                    if seen.insert(record.url.clone()) {
                        existing.push(record.clone());
                        inserted += 1;
                    }
                }

                Ok(SaveSummary {
                    submitted: records.len(),
                    inserted,
                    skipped: records.len() - inserted,
                })
            })
            .await?;

        tracing::info!(
            submitted = summary.submitted,
            inserted = summary.inserted,
            skipped = summary.skipped,
            "saved content records"
        );
        Ok(summary)
    }

    /// Every stored record. Load failures are logged and yield empty.
    pub async fn load_all(&self) -> Vec<ContentRecord> {
        self.load_collection(NEWS_COLLECTION).await
    }
}
