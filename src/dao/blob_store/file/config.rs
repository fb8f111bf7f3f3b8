use std::path::PathBuf;

/// Where the file store keeps its blobs.
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    pub data_dir: PathBuf,
}

impl FileStoreConfig {
    /// Store blobs under `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }
}
