mod config;
mod error;
mod store;

pub use config::FileStoreConfig;
pub use error::FileDaoError;
pub use store::FileBlobStore;

use crate::dao::storage::StorageError;

impl From<FileDaoError> for StorageError {
    fn from(err: FileDaoError) -> Self {
        StorageError::unavailable(err.to_string(), err)
    }
}
