pub mod file;
pub mod memory;

use std::fmt;

use futures::future::BoxFuture;

use crate::dao::storage::StorageResult;

/// Stable identifiers of the persisted blobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlobKey {
    /// Lineup, winning points and announcement preferences.
    Settings,
    /// Stored finished matches.
    History,
    /// Lifetime statistics ledger.
    Ledger,
}

impl BlobKey {
    /// Name used by backends to address the blob.
    pub fn as_str(self) -> &'static str {
        match self {
            BlobKey::Settings => "settings",
            BlobKey::History => "history",
            BlobKey::Ledger => "ledger",
        }
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Abstraction over the persistence medium: opaque blobs addressed by key.
pub trait BlobStore: Send + Sync {
    /// Read a blob; `None` when it was never written.
    fn load(&self, key: BlobKey) -> BoxFuture<'static, StorageResult<Option<Vec<u8>>>>;
    /// Replace a blob.
    fn save(&self, key: BlobKey, blob: Vec<u8>) -> BoxFuture<'static, StorageResult<()>>;
    /// Check that the medium is reachable.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
