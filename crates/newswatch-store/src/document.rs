//! Name-keyed JSON document persistence, one file per collection.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

/// Reads and writes whole JSON documents under a data directory.
///
/// A collection named `keywords` lives at `<data_dir>/keywords.json`.
/// Writes go to a sibling temp file first and are renamed into place so a
/// concurrent reader never sees a half-written document.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    data_dir: PathBuf,
}

impl DocumentStore {
    /// Open (creating if needed) the data directory and verify it is writable.
    ///
    /// This is the one fatal check of the store: callers abort startup if
    /// it fails.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or a
    /// probe file cannot be written into it.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let io_err = |source| StoreError::Io {
            collection: data_dir.display().to_string(),
            source,
        };

        std::fs::create_dir_all(&data_dir).map_err(io_err)?;
        let probe = data_dir.join(".write-probe");
        std::fs::write(&probe, b"ok").map_err(io_err)?;
        std::fs::remove_file(&probe).map_err(io_err)?;

        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    #[must_use]
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{collection}.json"))
    }

    /// Serialize `data` as pretty UTF-8 JSON and replace the collection file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Malformed`] if `data` cannot be serialized and
    /// [`StoreError::Io`] if the write or rename fails.
    pub async fn save<T>(&self, collection: &str, data: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_vec_pretty(data).map_err(|source| StoreError::Malformed {
            collection: collection.to_string(),
            source,
        })?;

        let path = self.path_for(collection);
        let tmp = self.data_dir.join(format!(".{collection}.json.tmp"));
        let io_err = |source| StoreError::Io {
            collection: collection.to_string(),
            source,
        };

        tokio::fs::write(&tmp, &body).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err)?;

        tracing::debug!(
            collection,
            path = %path.display(),
            bytes = body.len(),
            "document saved"
        );
        Ok(())
    }

    /// Load a collection document. A missing file yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] on read failure and
    /// [`StoreError::Malformed`] when the file does not parse as `T`.
    pub async fn load<T>(&self, collection: &str) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = self.path_for(collection);
        let body = match tokio::fs::read(&path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(collection, path = %path.display(), "document missing, using default");
                return Ok(None);
            }
            Err(source) => {
                return Err(StoreError::Io {
                    collection: collection.to_string(),
                    source,
                })
            }
        };

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|source| StoreError::Malformed {
                collection: collection.to_string(),
                source,
            })
    }

    /// Load a collection, falling back to `default` on any failure.
    ///
    /// Failures are logged; this is the "load(name, default)" contract used
    /// by read paths that must always return a usable value.
    pub async fn load_or<T>(&self, collection: &str, default: T) -> T
    where
        T: DeserializeOwned,
    {
        match self.load(collection).await {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::error!(collection, error = %e, "failed to load document");
                default
            }
        }
    }
}
