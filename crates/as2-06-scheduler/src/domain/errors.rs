//! Scheduler error types.

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("Directory {0} is already watched")]
    AlreadyWatched(String),

    #[error("Directory {0} is not watched")]
    DirectoryNotWatched(String),

    #[error("File {0} is not watched")]
    FileNotWatched(String),

    #[error("Cannot prepare directory {path}: {reason}")]
    Io { path: String, reason: String },
}

impl SchedulerError {
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        SchedulerError::Io {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}
