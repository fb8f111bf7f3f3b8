use std::{collections::HashMap, sync::Arc};

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::dao::{
    blob_store::{BlobKey, BlobStore},
    storage::StorageResult,
};

/// Volatile store, used when no data directory should be touched and in tests.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<BlobKey, Vec<u8>>>>,
}

impl MemoryBlobStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self, key: BlobKey) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>> {
        let blobs = self.blobs.clone();
        Box::pin(async move { Ok(blobs.read().await.get(&key).cloned()) })
    }

    fn save(&self, key: BlobKey, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        let blobs = self.blobs.clone();
        Box::pin(async move {
            blobs.write().await.insert(key, blob);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
