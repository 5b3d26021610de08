//! Exclusive ownership of the node's system directory.
//!
//! Uses `fs2` (flock on Unix, LockFile on Windows). Two nodes sharing one
//! pending-info directory would race on correlation records.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::info;

use crate::domain::errors::StorageError;

/// Held for the lifetime of the node, released on drop. The `LOCK` file
/// stays behind; every owner locks the same inode.
///
/// ```ignore
/// let _lock = DirectoryLock::acquire(&layout.dir(SystemDir::System))?;
/// ```
pub struct DirectoryLock {
    file: File,
    path: PathBuf,
}

impl DirectoryLock {
    const LOCK_FILE: &'static str = "LOCK";

    /// Fails immediately with `Locked` if another process holds the lock.
    pub fn acquire(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir).map_err(|e| StorageError::io(dir, e))?;
        let path = dir.join(Self::LOCK_FILE);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| StorageError::io(&path, e))?;

        if file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked {
                path: dir.display().to_string(),
            });
        }

        file.set_len(0).map_err(|e| StorageError::io(&path, e))?;
        writeln!(file, "{}", std::process::id()).map_err(|e| StorageError::io(&path, e))?;
        file.sync_all().map_err(|e| StorageError::io(&path, e))?;

        info!("[as2-02] Acquired lock {}", path.display());
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DirectoryLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = self.file.unlock();
    }
}
