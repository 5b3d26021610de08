//! Storage error types.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Errors raised by `MessageStore` implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The key sanitized to an empty file name.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("No pending MDN info stored for {0}")]
    PendingInfoNotFound(String),

    #[error("I/O error on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("Corrupt record {path}: {reason}")]
    Corrupt { path: String, reason: String },

    #[error("Storage directory {path} is locked by another process")]
    Locked { path: String },
}

impl StorageError {
    pub fn io(path: &Path, err: io::Error) -> Self {
        StorageError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }

    pub fn corrupt(path: &Path, reason: impl ToString) -> Self {
        StorageError::Corrupt {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}
