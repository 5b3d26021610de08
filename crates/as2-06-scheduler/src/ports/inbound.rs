//! # Inbound Port - SchedulerApi
//!
//! What the node runtime (startup wiring, admin commands) drives.

use std::path::Path;

use async_trait::async_trait;

use crate::domain::entities::{WatchedDir, WatchedFile};
use crate::domain::errors::SchedulerError;
use crate::service::FlushOutcome;

#[async_trait]
pub trait SchedulerApi: Send + Sync {
    /// Starts watching `directory`, creating it if missing. Files already
    /// present are picked up as new.
    ///
    /// ## Errors
    ///
    /// - `AlreadyWatched`: the directory has a watch
    /// - `Io`: the directory cannot be created
    fn watch_directory(
        &self,
        directory: &Path,
        sender_id: &str,
        receiver_id: &str,
    ) -> Result<(), SchedulerError>;

    /// Drops the watch and every record under it.
    fn stop_watching(&self, directory: &Path) -> Result<(), SchedulerError>;

    /// Queues a watched file for another attempt after the backoff.
    fn resend_file(&self, file: &Path) -> Result<WatchedFile, SchedulerError>;

    /// Sends every due file, one at a time. Dropped if a flush is running.
    async fn flush(&self) -> FlushOutcome;

    fn watched_directories(&self) -> Vec<WatchedDir>;

    fn watched_files(&self) -> Vec<WatchedFile>;
}
