//! Error types for the store module.

use std::path::PathBuf;

use policy_status_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file could not be created, opened or locked.
    #[error("storage unavailable at {}: {source}", .path.display())]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// The file carries a schema this build does not understand.
    #[error("migration error: {0}")]
    Migration(String),

    /// Malformed caller input.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ValidationError),

    /// No record exists for the policy.
    #[error("policy not found: {0}")]
    NotFound(String),

    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A thread panicked while holding the store lock.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// The handle, or the handle it was derived from, has been closed.
    #[error("store is closed")]
    Closed,
}

/// Coarse classification of a [`StoreError`].
///
/// Lets callers branch on the failure class without matching engine details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StorageUnavailable,
    InvalidArgument,
    NotFound,
    Storage,
    Closed,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::StorageUnavailable { .. } | StoreError::Migration(_) => {
                ErrorKind::StorageUnavailable
            }
            StoreError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::Database(_) | StoreError::LockPoisoned => ErrorKind::Storage,
            StoreError::Closed => ErrorKind::Closed,
        }
    }

    /// Re-tag an engine failure that happened while opening `path`.
    pub(crate) fn unavailable_at(self, path: impl Into<PathBuf>) -> Self {
        match self {
            StoreError::Database(source) => StoreError::StorageUnavailable {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
