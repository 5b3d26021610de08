//! The directory polling service: outbox watches, debounce, flush, resend.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{MessageStatus, OutgoingFileMessage};
use tokio::sync::watch;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::adapters::observer::{DirectoryObserver, FileEvent};
use crate::domain::config::SchedulerConfig;
use crate::domain::entities::{WatchStatus, WatchedDir, WatchedFile};
use crate::domain::errors::SchedulerError;
use crate::domain::registry::{Observed, WatchRegistry};
use crate::ports::inbound::SchedulerApi;
use crate::ports::outbound::{FileSender, TimeSource};

/// Result of one flush signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Another flush was running; this one was dropped.
    Skipped,
    Completed { sent: usize, failed: usize },
}

/// Holds the single-flight flag for the length of one flush.
struct FlushGuard<'a>(&'a AtomicBool);

impl<'a> FlushGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FlushGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct DirectoryPollingService {
    registry: Mutex<WatchRegistry>,
    observers: Mutex<Vec<DirectoryObserver>>,
    sender: Arc<dyn FileSender>,
    time: Arc<dyn TimeSource>,
    config: SchedulerConfig,
    flushing: AtomicBool,
}

impl DirectoryPollingService {
    pub fn new(
        sender: Arc<dyn FileSender>,
        time: Arc<dyn TimeSource>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry: Mutex::new(WatchRegistry::new()),
            observers: Mutex::new(Vec::new()),
            sender,
            time,
            config,
            flushing: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Scans every watched directory once and applies what changed.
    /// Returns the number of events seen.
    pub fn poll(&self) -> usize {
        let events: Vec<FileEvent> = self
            .observers
            .lock()
            .iter_mut()
            .flat_map(|observer| observer.check())
            .collect();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    pub fn handle_event(&self, event: FileEvent) {
        match event {
            FileEvent::Created(path) | FileEvent::Changed(path) => self.watch_file(&path),
            FileEvent::Deleted(path) => self.forget_file(&path),
        }
    }

    fn watch_file(&self, path: &Path) {
        if !path.exists() {
            debug!(file = %path.display(), "[as2-06] File to watch not found");
            return;
        }
        let now = self.time.now();
        match self.registry.lock().observe(path, now) {
            Observed::Added => {
                info!(file = %path.display(), "[as2-06] Watching new file")
            }
            Observed::Debounced => {
                debug!(file = %path.display(), "[as2-06] File changed, send postponed")
            }
            Observed::Unchanged(WatchStatus::Send) => {
                error!(file = %path.display(), "[as2-06] File is currently being sent")
            }
            Observed::Unchanged(status) => {
                warn!(file = %path.display(), %status, "[as2-06] File already queued")
            }
            Observed::UnknownDirectory => {
                debug!(file = %path.display(), "[as2-06] Parent directory not watched")
            }
        }
    }

    fn forget_file(&self, path: &Path) {
        if self.registry.lock().remove_file(path).is_some() {
            debug!(file = %path.display(), "[as2-06] Removing file from watch list");
        }
    }

    /// Sends every due file in eligibility order, waiting for each send to
    /// finish before taking the next.
    pub async fn flush(&self) -> FlushOutcome {
        let Some(_guard) = FlushGuard::acquire(&self.flushing) else {
            debug!("[as2-06] Already sending files, flush dropped");
            return FlushOutcome::Skipped;
        };

        let (mut sent, mut failed) = (0, 0);
        loop {
            let now = self.time.now();
            let next = self.registry.lock().take_next(now, Path::exists);
            let Some(file) = next else {
                break;
            };

            debug!(file = %file.file.display(), retries = file.retries, "[as2-06] Trying to send file");
            let message = OutgoingFileMessage::new(&file.file, &file.sender_id, &file.receiver_id);
            let result = self.sender.send_file(message).await;

            if result.status == MessageStatus::Failed {
                error!(
                    file = %file.file.display(),
                    message_id = %result.message_id,
                    error = result.error_cause.as_deref().unwrap_or("unknown"),
                    "[as2-06] Error detected while sending file"
                );
                failed += 1;
            } else {
                self.registry.lock().remove_file(&file.file);
                info!(
                    file = %file.file.display(),
                    message_id = %result.message_id,
                    status = ?result.status,
                    "[as2-06] File handed off"
                );
                sent += 1;
            }
        }
        FlushOutcome::Completed { sent, failed }
    }

    /// Polls and flushes on the configured intervals until `shutdown`
    /// fires. The first flush comes one interval after start. Flushes run
    /// as their own tasks so polling continues during a long send.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            poll_ms = self.config.poll_interval_ms,
            flush_ms = self.config.flush_interval_ms,
            "[as2-06] Scheduler started"
        );
        let mut poll = interval(self.config.poll_interval());
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let period = self.config.flush_interval();
        let mut flush = interval_at(Instant::now() + period, period);
        flush.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.poll();
                }
                _ = flush.tick() => {
                    let service = Arc::clone(&self);
                    tokio::spawn(async move {
                        service.flush().await;
                    });
                }
                _ = shutdown.changed() => {
                    info!("[as2-06] Shutdown signal received");
                    break;
                }
            }
        }
    }
}

#[async_trait]
impl SchedulerApi for DirectoryPollingService {
    fn watch_directory(
        &self,
        directory: &Path,
        sender_id: &str,
        receiver_id: &str,
    ) -> Result<(), SchedulerError> {
        fs::create_dir_all(directory).map_err(|e| SchedulerError::io(directory, e))?;
        let dir = WatchedDir::new(directory, sender_id, receiver_id);
        info!(dir = %dir, "[as2-06] Watching directory");
        self.registry.lock().add_dir(dir)?;

        let mut observer = DirectoryObserver::new(directory);
        let events = observer.check();
        self.observers.lock().push(observer);
        for event in events {
            self.handle_event(event);
        }
        Ok(())
    }

    fn stop_watching(&self, directory: &Path) -> Result<(), SchedulerError> {
        let dir = self.registry.lock().remove_dir(directory)?;
        self.observers
            .lock()
            .retain(|observer| observer.directory() != directory);
        info!(dir = %dir, "[as2-06] Stopped watching directory");
        Ok(())
    }

    fn resend_file(&self, file: &Path) -> Result<WatchedFile, SchedulerError> {
        let now = self.time.now();
        let watched = self.registry.lock().resend(file, now)?;
        info!(file = %watched, eligible_at = watched.eligible_at, "[as2-06] File queued for resend");
        Ok(watched)
    }

    async fn flush(&self) -> FlushOutcome {
        DirectoryPollingService::flush(self).await
    }

    fn watched_directories(&self) -> Vec<WatchedDir> {
        self.registry.lock().dirs()
    }

    fn watched_files(&self) -> Vec<WatchedFile> {
        self.registry.lock().files()
    }
}
