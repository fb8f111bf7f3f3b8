//! Error types shared by the file storage implementation.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Convenient result alias returning [`FileDaoError`] failures.
pub type FileResult<T> = Result<T, FileDaoError>;

/// Failures that can occur while reading or writing blob files.
#[derive(Debug, Error)]
pub enum FileDaoError {
    /// The data directory could not be created.
    #[error("failed to create data directory `{path}`")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The data directory is missing or not a directory.
    #[error("data directory `{path}` is not accessible")]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Reading a blob file failed.
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Writing the temporary blob file failed.
    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Moving the temporary file over the blob failed.
    #[error("failed to replace `{path}`")]
    Rename {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
