//! Watched directories and the files found in them.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// How long a new or changed file must stay quiet before it is sent.
pub const NEW_FILE_DEBOUNCE_MS: u64 = 15 * 1000;

/// Resend delay per retry: the n-th resend waits `n × 15` minutes.
pub const RESEND_BACKOFF_MS: u64 = 15 * 60 * 1000;

/// Where a watched file is in its send cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WatchStatus {
    /// Seen, waiting for the debounce window to pass.
    New,
    /// Handed to the send pipeline. A failed send stays here.
    Send,
    /// Explicitly queued for another attempt.
    Resend,
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WatchStatus::New => "NEW",
            WatchStatus::Send => "SEND",
            WatchStatus::Resend => "RESEND",
        };
        f.write_str(s)
    }
}

/// An outbox directory and the identities its files are sent between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedDir {
    pub directory: PathBuf,
    pub sender_id: String,
    pub receiver_id: String,
}

impl WatchedDir {
    pub fn new(directory: impl AsRef<Path>, sender_id: &str, receiver_id: &str) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
        }
    }
}

impl fmt::Display for WatchedDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{dir={}, sender={}, receiver={}}}",
            self.directory.display(),
            self.sender_id,
            self.receiver_id
        )
    }
}

/// A candidate for sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedFile {
    pub file: PathBuf,
    pub sender_id: String,
    pub receiver_id: String,
    pub status: WatchStatus,
    pub retries: u32,
    /// Not sent before this instant.
    pub eligible_at: Timestamp,
}

impl WatchedFile {
    /// A first sighting: `NEW`, eligible once the debounce window has passed.
    pub fn new(file: impl AsRef<Path>, dir: &WatchedDir, now: Timestamp) -> Self {
        Self {
            file: file.as_ref().to_path_buf(),
            sender_id: dir.sender_id.clone(),
            receiver_id: dir.receiver_id.clone(),
            status: WatchStatus::New,
            retries: 0,
            eligible_at: now + NEW_FILE_DEBOUNCE_MS,
        }
    }

    /// Restarts the debounce window.
    pub fn debounce(&mut self, now: Timestamp) {
        self.eligible_at = now + NEW_FILE_DEBOUNCE_MS;
    }

    pub fn schedule_resend(&mut self, now: Timestamp) {
        self.retries += 1;
        self.status = WatchStatus::Resend;
        self.eligible_at = now + RESEND_BACKOFF_MS * u64::from(self.retries);
    }

    /// Waiting to be sent and due.
    pub fn is_due(&self, now: Timestamp) -> bool {
        matches!(self.status, WatchStatus::New | WatchStatus::Resend) && self.eligible_at <= now
    }
}

impl fmt::Display for WatchedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{file={}, sender={}, receiver={}, status={}, retries={}}}",
            self.file.display(),
            self.sender_id,
            self.receiver_id,
            self.status,
            self.retries
        )
    }
}
