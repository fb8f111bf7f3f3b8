use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::future::BoxFuture;
use tokio::fs;

use crate::dao::{
    blob_store::{BlobKey, BlobStore},
    storage::StorageResult,
};

use super::{
    config::FileStoreConfig,
    error::{FileDaoError, FileResult},
};

/// One JSON file per blob inside the data directory.
///
/// Writes go to a temporary sibling first and are renamed over the blob, so a
/// crash mid-write leaves the previous version in place.
#[derive(Clone)]
pub struct FileBlobStore {
    root: Arc<Path>,
}

impl FileBlobStore {
    /// Open the store, creating the data directory when needed.
    pub async fn connect(config: FileStoreConfig) -> FileResult<Self> {
        let root = config.data_dir;
        fs::create_dir_all(&root)
            .await
            .map_err(|source| FileDaoError::CreateDir {
                path: root.clone(),
                source,
            })?;
        Ok(Self {
            root: Arc::from(root),
        })
    }

    fn blob_path(&self, key: BlobKey) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    fn temp_path(&self, key: BlobKey) -> PathBuf {
        self.root.join(format!("{key}.json.tmp"))
    }

    async fn read(&self, key: BlobKey) -> FileResult<Option<Vec<u8>>> {
        let path = self.blob_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(FileDaoError::Read { path, source }),
        }
    }

    async fn write(&self, key: BlobKey, blob: &[u8]) -> FileResult<()> {
        let temp = self.temp_path(key);
        fs::write(&temp, blob)
            .await
            .map_err(|source| FileDaoError::Write {
                path: temp.clone(),
                source,
            })?;

        let path = self.blob_path(key);
        fs::rename(&temp, &path)
            .await
            .map_err(|source| FileDaoError::Rename { path, source })
    }

    async fn check_root(&self) -> FileResult<()> {
        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|source| FileDaoError::DataDir {
                path: self.root.to_path_buf(),
                source,
            })?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(FileDaoError::DataDir {
                path: self.root.to_path_buf(),
                source: io::Error::other("not a directory"),
            })
        }
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self, key: BlobKey) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>> {
        let store = self.clone();
        Box::pin(async move { store.read(key).await.map_err(Into::into) })
    }

    fn save(&self, key: BlobKey, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.write(key, &blob).await.map_err(Into::into) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { store.check_root().await.map_err(Into::into) })
    }
}
