//! Keyword collection CRUD.

use chrono::Local;
use newswatch_core::{Keyword, Status, DEFAULT_CATEGORY};

use crate::store::RecordStore;
use crate::{StoreError, KEYWORDS_COLLECTION};

impl RecordStore {
    /// Add a keyword with `status = active`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Invalid`] if `name` is blank.
    /// - [`StoreError::Duplicate`] if a keyword with the same name exists;
    ///   the collection is left unchanged.
    pub async fn add_keyword(
        &self,
        name: &str,
        category: Option<&str>,
    ) -> Result<Keyword, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("keyword name must be non-empty".to_string()));
        }
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let keyword = self
            .mutate(KEYWORDS_COLLECTION, |keywords: &mut Vec<Keyword>| {
                if keywords.iter().any(|k| k.name == name) {
                    return Err(StoreError::Duplicate {
                        collection: KEYWORDS_COLLECTION.to_string(),
                        key: name.to_string(),
                    });
                }
                let now = Local::now().naive_local();
                let keyword = Keyword {
                    name: name.to_string(),
                    category: category.to_string(),
                    status: Status::Active,
                    created_at: now,
                    updated_at: now,
                };
                keywords.push(keyword.clone());
                Ok(keyword)
            })
            .await?;

        tracing::info!(keyword = %keyword.name, category = %keyword.category, "keyword added");
        Ok(keyword)
    }

    /// Remove the keyword named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such keyword exists.
    pub async fn delete_keyword(&self, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        self.mutate(KEYWORDS_COLLECTION, |keywords: &mut Vec<Keyword>| {
            let before = keywords.len();
            keywords.retain(|k| k.name != name);
            if keywords.len() == before {
                return Err(StoreError::NotFound {
                    collection: KEYWORDS_COLLECTION.to_string(),
                    key: name.to_string(),
                });
            }
            Ok(())
        })
        .await?;

        tracing::info!(keyword = name, "keyword deleted");
        Ok(())
    }

    /// Set the status of `name` and bump its `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such keyword exists.
    pub async fn update_keyword_status(
        &self,
        name: &str,
        status: Status,
    ) -> Result<Keyword, StoreError> {
        let name = name.trim();
        let keyword = self
            .mutate(KEYWORDS_COLLECTION, |keywords: &mut Vec<Keyword>| {
                let Some(keyword) = keywords.iter_mut().find(|k| k.name == name) else {
                    return Err(StoreError::NotFound {
                        collection: KEYWORDS_COLLECTION.to_string(),
                        key: name.to_string(),
                    });
                };
                keyword.status = status;
                keyword.updated_at = Local::now().naive_local();
                Ok(keyword.clone())
            })
            .await?;

        tracing::info!(keyword = name, %status, "keyword status updated");
        Ok(keyword)
    }

    pub async fn list_keywords(&self) -> Vec<Keyword> {
        self.load_collection(KEYWORDS_COLLECTION).await
    }

    pub async fn get_keyword(&self, name: &str) -> Option<Keyword> {
        let name = name.trim();
        self.list_keywords()
            .await
            .into_iter()
            .find(|k| k.name == name)
    }

    pub async fn keywords_by_category(&self, category: &str) -> Vec<Keyword> {
        self.find(KEYWORDS_COLLECTION, |k: &Keyword| k.category == category)
            .await
    }

    pub async fn active_keywords(&self) -> Vec<Keyword> {
        self.find(KEYWORDS_COLLECTION, Keyword::is_active).await
    }
}
