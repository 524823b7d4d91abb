//! Platform collection CRUD.

use chrono::Local;
use newswatch_core::{Platform, SourceTag, Status};

use crate::store::RecordStore;
use crate::{StoreError, PLATFORMS_COLLECTION};

/// Next `platform_<n>` id: `n` starts at `len + 1` and is bumped past any
/// id still in use (ids can be freed out of order by deletes).
fn next_platform_id(platforms: &[Platform]) -> String {
    let mut n = platforms.len() + 1;
    loop {
        let candidate = format!("platform_{n}");
        if !platforms.iter().any(|p| p.id == candidate) {
            return candidate;
        }
        n += 1;
    }
}

impl RecordStore {
    /// Register a platform backed by `source_type`.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Invalid`] if `name` is blank.
    /// - [`StoreError::Duplicate`] if a platform with the same name exists.
    pub async fn add_platform(
        &self,
        name: &str,
        source_type: SourceTag,
    ) -> Result<Platform, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Invalid("platform name must be non-empty".to_string()));
        }

        let platform = self
            .mutate(PLATFORMS_COLLECTION, |platforms: &mut Vec<Platform>| {
                if platforms.iter().any(|p| p.name == name) {
                    return Err(StoreError::Duplicate {
                        collection: PLATFORMS_COLLECTION.to_string(),
                        key: name.to_string(),
                    });
                }
                let platform = Platform {
                    id: next_platform_id(platforms),
                    name: name.to_string(),
                    source_type,
                    status: Status::Active,
                    created_at: Local::now().naive_local(),
                };
                platforms.push(platform.clone());
                Ok(platform)
            })
            .await?;

        tracing::info!(
            platform = %platform.name,
            id = %platform.id,
            source = %platform.source_type,
            "platform added"
        );
        Ok(platform)
    }

    /// Remove the platform with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such platform exists.
    pub async fn delete_platform(&self, id: &str) -> Result<(), StoreError> {
        let id = id.trim();
        self.mutate(PLATFORMS_COLLECTION, |platforms: &mut Vec<Platform>| {
            let Some(pos) = platforms.iter().position(|p| p.id == id) else {
                return Err(StoreError::NotFound {
                    collection: PLATFORMS_COLLECTION.to_string(),
                    key: id.to_string(),
                });
            };
            platforms.remove(pos);
            Ok(())
        })
        .await?;

        tracing::info!(id, "platform deleted");
        Ok(())
    }

    /// Set the status of the platform with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no such platform exists.
    pub async fn update_platform_status(
        &self,
        id: &str,
        status: Status,
    ) -> Result<Platform, StoreError> {
        let id = id.trim();
        let platform = self
            .mutate(PLATFORMS_COLLECTION, |platforms: &mut Vec<Platform>| {
                let Some(platform) = platforms.iter_mut().find(|p| p.id == id) else {
                    return Err(StoreError::NotFound {
                        collection: PLATFORMS_COLLECTION.to_string(),
                        key: id.to_string(),
                    });
                };
                platform.status = status;
                Ok(platform.clone())
            })
            .await?;

        tracing::info!(id, %status, "platform status updated");
        Ok(platform)
    }

    pub async fn list_platforms(&self) -> Vec<Platform> {
        self.load_collection(PLATFORMS_COLLECTION).await
    }

    pub async fn get_platform(&self, id: &str) -> Option<Platform> {
        let id = id.trim();
        self.list_platforms().await.into_iter().find(|p| p.id == id)
    }

    pub async fn get_platform_by_name(&self, name: &str) -> Option<Platform> {
        let name = name.trim();
        self.list_platforms()
            .await
            .into_iter()
            .find(|p| p.name == name)
    }

    pub async fn active_platforms(&self) -> Vec<Platform> {
        self.find(PLATFORMS_COLLECTION, Platform::is_active).await
    }
}
