//! # File System Storage
//!
//! `MessageStore` backed by plain files under a `StorageLayout`. Records are
//! pretty-printed JSON so an operator can inspect them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use shared_types::naming::{sanitize_file_name, unique_file_name};
use shared_types::{MdnDocument, PendingMdnInfo};

use crate::domain::errors::StorageError;
use crate::domain::layout::{StorageLayout, SystemDir};
use crate::ports::inbound::MessageStore;

pub struct FileSystemStorage {
    layout: StorageLayout,
    /// Serializes every operation; a pending record and its data file are
    /// written as one step from a caller's point of view.
    lock: Mutex<()>,
}

impl FileSystemStorage {
    /// Opens storage on `layout`, creating missing directories.
    pub fn open(layout: StorageLayout) -> Result<Self, StorageError> {
        layout.create_all()?;
        info!("[as2-02] Storage opened at {}", layout.home().display());
        Ok(Self {
            layout,
            lock: Mutex::new(()),
        })
    }

    pub fn layout(&self) -> &StorageLayout {
        &self.layout
    }

    fn key(raw: &str) -> Result<String, StorageError> {
        let key = sanitize_file_name(raw);
        if key.is_empty() {
            return Err(StorageError::InvalidKey(raw.to_string()));
        }
        Ok(key)
    }

    fn pending_info_path(&self, message_id: &str) -> Result<PathBuf, StorageError> {
        let key = Self::key(message_id)?;
        Ok(self
            .layout
            .dir(SystemDir::PendingMdnInfo)
            .join(format!("{}.json", key)))
    }

    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| StorageError::corrupt(path, e))?;
        fs::write(path, bytes).map_err(|e| StorageError::io(path, e))
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StorageError> {
        let bytes = fs::read(path).map_err(|e| StorageError::io(path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::corrupt(path, e))
    }
}

/// Renames, falling back to copy and remove across file systems.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            debug!(
                "[as2-02] rename {} failed ({}), copying",
                from.display(),
                rename_err
            );
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))
}

fn file_name_of(path: &Path) -> Result<String, StorageError> {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| StorageError::InvalidKey(path.display().to_string()))
}

impl MessageStore for FileSystemStorage {
    fn save_incoming_file(
        &self,
        sender_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let sender = Self::key(sender_id)?;
        let name = Self::key(file_name)?;
        let _guard = self.lock.lock();

        let dir = self.layout.dir(SystemDir::Inbox).join(sender);
        ensure_dir(&dir)?;
        let path = unique_file_name(&dir, &name);
        fs::write(&path, data).map_err(|e| StorageError::io(&path, e))?;
        info!("[as2-02] Saved incoming file {}", path.display());
        Ok(path)
    }

    fn save_mdn(&self, key: &str, mdn: &MdnDocument) -> Result<PathBuf, StorageError> {
        let key = Self::key(key)?;
        let _guard = self.lock.lock();

        let dir = self.layout.dir(SystemDir::Mdn);
        ensure_dir(&dir)?;
        let path = unique_file_name(&dir, &format!("{}.mdn.json", key));
        Self::write_json(&path, mdn)?;
        debug!("[as2-02] Saved MDN {}", path.display());
        Ok(path)
    }

    fn save_pending_info(
        &self,
        message_id: &str,
        original_file: &Path,
        outgoing_mic: &str,
    ) -> Result<PendingMdnInfo, StorageError> {
        let info_path = self.pending_info_path(message_id)?;
        let name = file_name_of(original_file)?;
        let _guard = self.lock.lock();

        let pending_dir = self.layout.dir(SystemDir::PendingMdn);
        ensure_dir(&pending_dir)?;
        let pending_file = unique_file_name(&pending_dir, &name);
        move_file(original_file, &pending_file).map_err(|e| StorageError::io(original_file, e))?;

        let info = PendingMdnInfo {
            original_file: original_file.to_path_buf(),
            pending_file: pending_file.clone(),
            outgoing_mic: outgoing_mic.to_string(),
        };

        if let Err(err) = Self::write_json(&info_path, &info) {
            if let Err(undo) = move_file(&pending_file, original_file) {
                warn!(
                    "[as2-02] Could not move {} back after failed record write: {}",
                    pending_file.display(),
                    undo
                );
            }
            return Err(err);
        }

        info!(
            "[as2-02] Pending MDN info saved for {} ({})",
            message_id,
            pending_file.display()
        );
        Ok(info)
    }

    fn load_pending_info(&self, message_id: &str) -> Result<PendingMdnInfo, StorageError> {
        let info_path = self.pending_info_path(message_id)?;
        let _guard = self.lock.lock();

        if !info_path.is_file() {
            return Err(StorageError::PendingInfoNotFound(message_id.to_string()));
        }
        Self::read_json(&info_path)
    }

    fn delete_pending_info(&self, message_id: &str) -> Result<bool, StorageError> {
        let info_path = self.pending_info_path(message_id)?;
        let _guard = self.lock.lock();

        if !info_path.is_file() {
            return Ok(false);
        }
        // A corrupt record is still removed, its data file cannot be located.
        match Self::read_json::<PendingMdnInfo>(&info_path) {
            Ok(info) => {
                if info.pending_file.exists() {
                    fs::remove_file(&info.pending_file)
                        .map_err(|e| StorageError::io(&info.pending_file, e))?;
                }
            }
            Err(err) => warn!("[as2-02] Removing unreadable record: {}", err),
        }
        fs::remove_file(&info_path).map_err(|e| StorageError::io(&info_path, e))?;
        info!("[as2-02] Pending MDN info deleted for {}", message_id);
        Ok(true)
    }

    fn archive_sent_file(&self, path: &Path) -> Result<PathBuf, StorageError> {
        let name = file_name_of(path)?;
        let _guard = self.lock.lock();

        let dir = self.layout.dir(SystemDir::Sent);
        ensure_dir(&dir)?;
        let target = unique_file_name(&dir, &name);
        move_file(path, &target).map_err(|e| StorageError::io(path, e))?;
        debug!("[as2-02] Archived {} to {}", path.display(), target.display());
        Ok(target)
    }
}
