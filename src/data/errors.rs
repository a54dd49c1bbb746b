//! # Dataset Errors
//!
//! Failures while reading the dataset file. These never reach a client:
//! the fail-soft loader turns them into an empty dataset.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for dataset loading
pub type DataResult<T> = Result<T, DataError>;

/// Dataset loading errors
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The dataset file is not a valid record list
    #[error("Invalid dataset in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Valid JSON, but neither a record array nor a `records` envelope
    #[error(
        "Invalid dataset in {}: expected an array of records or an object with a \"records\" array",
        path.display()
    )]
    Shape { path: PathBuf },
}

impl DataError {
    /// Path of the dataset that failed to load
    pub fn path(&self) -> &PathBuf {
        match self {
            DataError::Io { path, .. }
            | DataError::Parse { path, .. }
            | DataError::Shape { path } => path,
        }
    }
}
