//! Snapshot-based directory observer.
//!
//! Each `check()` lists the directory and compares it with the previous
//! listing. A file whose size or modification time moved is reported as
//! changed. Subdirectories are not descended into.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    Created(PathBuf),
    Changed(PathBuf),
    Deleted(PathBuf),
}

impl FileEvent {
    pub fn path(&self) -> &Path {
        match self {
            FileEvent::Created(p) | FileEvent::Changed(p) | FileEvent::Deleted(p) => p,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stamp {
    len: u64,
    modified: Option<SystemTime>,
}

#[derive(Debug)]
pub struct DirectoryObserver {
    directory: PathBuf,
    snapshot: HashMap<PathBuf, Stamp>,
}

impl DirectoryObserver {
    /// Starts from an empty snapshot, so the first `check()` reports every
    /// file already present as created.
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            snapshot: HashMap::new(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Events since the last check, sorted by path.
    pub fn check(&mut self) -> Vec<FileEvent> {
        let current = self.list();
        let mut events = Vec::new();

        for (path, stamp) in &current {
            match self.snapshot.get(path) {
                None => events.push(FileEvent::Created(path.clone())),
                Some(previous) if previous != stamp => {
                    events.push(FileEvent::Changed(path.clone()))
                }
                Some(_) => {}
            }
        }
        for path in self.snapshot.keys() {
            if !current.contains_key(path) {
                events.push(FileEvent::Deleted(path.clone()));
            }
        }

        self.snapshot = current;
        events.sort_by(|a, b| a.path().cmp(b.path()));
        events
    }

    fn list(&self) -> HashMap<PathBuf, Stamp> {
        let entries = match fs::read_dir(&self.directory) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(
                    dir = %self.directory.display(),
                    error = %err,
                    "[as2-06] Cannot list directory"
                );
                return HashMap::new();
            }
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let meta = entry.metadata().ok()?;
                if !meta.is_file() {
                    return None;
                }
                let stamp = Stamp {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                };
                Some((entry.path(), stamp))
            })
            .collect()
    }
}
