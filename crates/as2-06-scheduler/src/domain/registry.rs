//! In-memory bookkeeping of watched directories and their files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::{Timestamp, WatchStatus, WatchedDir, WatchedFile};
use crate::domain::errors::SchedulerError;

/// What a create/change signal did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observed {
    /// First sighting; now `NEW`.
    Added,
    /// Still `NEW`; the debounce window restarted.
    Debounced,
    /// Already `SEND` or `RESEND`; left as is.
    Unchanged(WatchStatus),
    /// The file's directory is not watched.
    UnknownDirectory,
}

#[derive(Debug)]
struct Entry {
    file: WatchedFile,
    /// Insertion order, breaks ties between equal eligibility times.
    seq: u64,
}

#[derive(Debug, Default)]
pub struct WatchRegistry {
    dirs: HashMap<PathBuf, WatchedDir>,
    files: HashMap<PathBuf, Entry>,
    next_seq: u64,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&mut self, dir: WatchedDir) -> Result<(), SchedulerError> {
        if self.dirs.contains_key(&dir.directory) {
            return Err(SchedulerError::AlreadyWatched(
                dir.directory.display().to_string(),
            ));
        }
        self.dirs.insert(dir.directory.clone(), dir);
        Ok(())
    }

    /// Forgets the directory and every file recorded under it.
    pub fn remove_dir(&mut self, directory: &Path) -> Result<WatchedDir, SchedulerError> {
        let dir = self
            .dirs
            .remove(directory)
            .ok_or_else(|| SchedulerError::DirectoryNotWatched(directory.display().to_string()))?;
        self.files.retain(|path, _| path.parent() != Some(directory));
        Ok(dir)
    }

    pub fn dir(&self, directory: &Path) -> Option<&WatchedDir> {
        self.dirs.get(directory)
    }

    pub fn dirs(&self) -> Vec<WatchedDir> {
        let mut dirs: Vec<_> = self.dirs.values().cloned().collect();
        dirs.sort_by(|a, b| a.directory.cmp(&b.directory));
        dirs
    }

    /// Records a created or changed file.
    pub fn observe(&mut self, path: &Path, now: Timestamp) -> Observed {
        if let Some(entry) = self.files.get_mut(path) {
            return match entry.file.status {
                WatchStatus::New => {
                    entry.file.debounce(now);
                    Observed::Debounced
                }
                status => Observed::Unchanged(status),
            };
        }

        let Some(dir) = path.parent().and_then(|parent| self.dirs.get(parent)) else {
            return Observed::UnknownDirectory;
        };
        let file = WatchedFile::new(path, dir, now);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.files.insert(path.to_path_buf(), Entry { file, seq });
        Observed::Added
    }

    pub fn remove_file(&mut self, path: &Path) -> Option<WatchedFile> {
        self.files.remove(path).map(|entry| entry.file)
    }

    pub fn file(&self, path: &Path) -> Option<&WatchedFile> {
        self.files.get(path).map(|entry| &entry.file)
    }

    /// All records, oldest first.
    pub fn files(&self) -> Vec<WatchedFile> {
        let mut entries: Vec<_> = self.files.values().collect();
        entries.sort_by_key(|entry| entry.seq);
        entries.into_iter().map(|entry| entry.file.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Picks the oldest due record whose file still exists and marks it `SEND`.
    ///
    /// Due records whose file is gone are skipped, not removed: the
    /// observer drops them when it reports the deletion.
    pub fn take_next(
        &mut self,
        now: Timestamp,
        exists: impl Fn(&Path) -> bool,
    ) -> Option<WatchedFile> {
        let entry = self
            .files
            .values_mut()
            .filter(|entry| entry.file.is_due(now) && exists(entry.file.file.as_path()))
            .min_by_key(|entry| (entry.file.eligible_at, entry.seq))?;
        entry.file.status = WatchStatus::Send;
        Some(entry.file.clone())
    }

    pub fn resend(&mut self, path: &Path, now: Timestamp) -> Result<WatchedFile, SchedulerError> {
        let entry = self
            .files
            .get_mut(path)
            .ok_or_else(|| SchedulerError::FileNotWatched(path.display().to_string()))?;
        entry.file.schedule_resend(now);
        Ok(entry.file.clone())
    }
}
