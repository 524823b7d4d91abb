use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per collection name, created on first use.
///
/// Held for the whole load-mutate-write cycle so concurrent writers on the
/// same collection cannot lose each other's updates.
#[derive(Debug, Default)]
pub(crate) struct CollectionLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl CollectionLocks {
    pub(crate) async fn acquire(&self, collection: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(map.entry(collection.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}
