use std::path::PathBuf;
use thiserror::Error;

/// Failures of a [`crate::store::KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode items for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no writable data directory is available")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReorderError {
    #[error("cannot start dragging {requested} while {active} is still being dragged")]
    AlreadyDragging { active: String, requested: String },
}

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("item {0} already exists in this category")]
    DuplicateId(String),
    #[error("item {0} not found")]
    UnknownItem(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
