use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::Instrument;

use crate::document::DocumentStore;
use crate::locks::CollectionLocks;
use crate::StoreError;

/// Owner of every persisted collection.
///
/// Adapters and the analyzer never hold state of their own; they read
/// snapshots from here and hand new records back through
/// [`RecordStore::save_records`].
#[derive(Debug)]
pub struct RecordStore {
    pub(crate) docs: DocumentStore,
    locks: CollectionLocks,
    span: tracing::Span,
}

impl RecordStore {
    /// Open the store rooted at `data_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory is not usable; callers
    /// treat this as fatal.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(DocumentStore::open(data_dir)?))
    }

    #[must_use]
    pub fn new(docs: DocumentStore) -> Self {
        Self {
            docs,
            locks: CollectionLocks::default(),
            span: tracing::info_span!("record_store"),
        }
    }

    /// Replace the span every store operation is logged under.
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    #[must_use]
    pub fn documents(&self) -> &DocumentStore {
        &self.docs
    }

    /// Snapshot of a whole collection. Failures are logged and yield empty.
    pub async fn load_collection<T>(&self, collection: &str) -> Vec<T>
    where
        T: DeserializeOwned,
    {
        self.docs
            .load_or(collection, Vec::new())
            .instrument(self.span.clone())
            .await
    }

    /// Items of `collection` matching `predicate`.
    pub async fn find<T, P>(&self, collection: &str, predicate: P) -> Vec<T>
    where
        T: DeserializeOwned,
        P: Fn(&T) -> bool,
    {
        let mut items: Vec<T> = self.load_collection(collection).await;
        items.retain(|item| predicate(item));
        items
    }

    /// Append one item to `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the collection cannot be loaded or written.
    pub async fn append<T>(&self, collection: &str, item: T) -> Result<(), StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
    {
        self.mutate(collection, move |items: &mut Vec<T>| {
            items.push(item);
            Ok(())
        })
        .await
    }

    /// Apply `patch` to every item matching `predicate`; returns how many
    /// items were patched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when nothing matched (the collection
    /// is left untouched), or an I/O / malformed-document error.
    pub async fn update<T, P, F>(
        &self,
        collection: &str,
        predicate: P,
        mut patch: F,
    ) -> Result<usize, StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
        P: Fn(&T) -> bool,
        F: FnMut(&mut T),
    {
        self.mutate(collection, |items: &mut Vec<T>| {
            let mut patched = 0usize;
            for item in items.iter_mut().filter(|item| predicate(item)) {
                patch(item);
                patched += 1;
            }
            if patched == 0 {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    key: "update predicate".to_string(),
                });
            }
            Ok(patched)
        })
        .await
    }

    /// Remove every item matching `predicate`; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when nothing matched, or an I/O /
    /// malformed-document error.
    pub async fn delete<T, P>(&self, collection: &str, predicate: P) -> Result<usize, StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
        P: Fn(&T) -> bool,
    {
        self.mutate(collection, |items: &mut Vec<T>| {
            let before = items.len();
            items.retain(|item| !predicate(item));
            let removed = before - items.len();
            if removed == 0 {
                return Err(StoreError::NotFound {
                    collection: collection.to_string(),
                    key: "delete predicate".to_string(),
                });
            }
            Ok(removed)
        })
        .await
    }

    /// Load-mutate-write under the collection's write lock.
    ///
    /// The document is rewritten only when `f` returns `Ok`. A malformed
    /// document aborts the mutation rather than being overwritten.
    pub(crate) async fn mutate<T, R, F>(&self, collection: &str, f: F) -> Result<R, StoreError>
    where
        T: Serialize + DeserializeOwned + Send,
        F: FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    {
        async {
            let _guard = self.locks.acquire(collection).await;

            let mut items: Vec<T> = match self.docs.load(collection).await {
                Ok(loaded) => loaded.unwrap_or_default(),
                Err(e) => {
                    tracing::error!(collection, error = %e, "cannot load collection for update");
                    return Err(e);
                }
            };

            let result = match f(&mut items) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(collection, error = %e, "collection update rejected");
                    return Err(e);
                }
            };

            if let Err(e) = self.docs.save(collection, &items).await {
                tracing::error!(collection, error = %e, "failed to persist collection");
                return Err(e);
            }
            Ok(result)
        }
        .instrument(self.span.clone())
        .await
    }
}
