//! Where each kind of file lives under the node's home directory.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::StorageError;

/// Directories the node owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemDir {
    Home,
    System,
    Certs,
    PendingMdn,
    PendingMdnInfo,
    Inbox,
    Outbox,
    Mdn,
    Temp,
    Sent,
}

impl SystemDir {
    pub const ALL: [SystemDir; 10] = [
        SystemDir::Home,
        SystemDir::System,
        SystemDir::Certs,
        SystemDir::PendingMdn,
        SystemDir::PendingMdnInfo,
        SystemDir::Inbox,
        SystemDir::Outbox,
        SystemDir::Mdn,
        SystemDir::Temp,
        SystemDir::Sent,
    ];
}

impl fmt::Display for SystemDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SystemDir::Home => "home",
            SystemDir::System => "system",
            SystemDir::Certs => "certs",
            SystemDir::PendingMdn => "pending-mdn",
            SystemDir::PendingMdnInfo => "pending-mdn-info",
            SystemDir::Inbox => "inbox",
            SystemDir::Outbox => "outbox",
            SystemDir::Mdn => "mdn",
            SystemDir::Temp => "temp",
            SystemDir::Sent => "sent",
        };
        f.write_str(s)
    }
}

/// Resolves `SystemDir`s against a home directory.
///
/// Any directory can be overridden individually; the rest keep their
/// default position relative to home.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    home: PathBuf,
    overrides: HashMap<SystemDir, PathBuf>,
}

impl StorageLayout {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, dir: SystemDir, path: impl Into<PathBuf>) -> Self {
        self.overrides.insert(dir, path.into());
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn dir(&self, dir: SystemDir) -> PathBuf {
        if let Some(path) = self.overrides.get(&dir) {
            return path.clone();
        }
        let system = || self.dir(SystemDir::System);
        match dir {
            SystemDir::Home => self.home.clone(),
            SystemDir::System => self.home.join("system"),
            SystemDir::Certs => self.home.join("certs"),
            SystemDir::Inbox => self.home.join("inbox"),
            SystemDir::Outbox => self.home.join("outbox"),
            SystemDir::PendingMdn => system().join("pending").join("mdn"),
            SystemDir::PendingMdnInfo => system().join("pending").join("mdn-info"),
            SystemDir::Mdn => system().join("mdn"),
            SystemDir::Temp => system().join("temp"),
            SystemDir::Sent => system().join("sent"),
        }
    }

    /// Creates every directory that does not exist yet.
    pub fn create_all(&self) -> Result<(), StorageError> {
        for dir in SystemDir::ALL {
            let path = self.dir(dir);
            fs::create_dir_all(&path).map_err(|e| StorageError::io(&path, e))?;
        }
        Ok(())
    }
}
