use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{MessageStatus, OutgoingFileMessage};
use tempfile::TempDir;
use tokio::sync::Notify;

use crate::domain::config::SchedulerConfig;
use crate::ports::outbound::{FileSender, MockTimeSource};
use crate::service::DirectoryPollingService;

/// Records every send. A successful send removes the file, as archiving does.
#[derive(Default)]
pub struct MockSender {
    pub sent: Mutex<Vec<OutgoingFileMessage>>,
    failing: AtomicBool,
    holding: AtomicBool,
    /// Signalled when a send starts.
    pub entered: Notify,
    /// Releases a held send.
    pub release: Notify,
}

impl MockSender {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every send wait for `release`.
    pub fn hold(&self) {
        self.holding.store(true, Ordering::SeqCst);
    }

    pub fn sent_names(&self) -> Vec<String> {
        self.sent.lock().iter().map(|m| m.file_name.clone()).collect()
    }
}

#[async_trait]
impl FileSender for MockSender {
    async fn send_file(&self, mut message: OutgoingFileMessage) -> OutgoingFileMessage {
        self.sent.lock().push(message.clone());
        self.entered.notify_one();
        if self.holding.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            message.status = MessageStatus::Failed;
            message.error_cause = Some("Partner answered with HTTP 503".to_string());
        } else {
            let _ = fs::remove_file(&message.file_path);
            message.status = MessageStatus::Sent;
        }
        message
    }
}

pub const START: u64 = 1_000_000;

pub struct Fixture {
    pub tmp: TempDir,
    pub time: Arc<MockTimeSource>,
    pub sender: Arc<MockSender>,
    pub service: Arc<DirectoryPollingService>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(SchedulerConfig::default())
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        let time = Arc::new(MockTimeSource::new(START));
        let sender = Arc::new(MockSender::default());
        let service = Arc::new(DirectoryPollingService::new(
            sender.clone(),
            time.clone(),
            config,
        ));
        Self {
            tmp: tempfile::tempdir().unwrap(),
            time,
            sender,
            service,
        }
    }

    pub fn outbox(&self) -> PathBuf {
        self.tmp.path().join("outbox").join("PartnerA")
    }

    pub fn write(&self, name: &str, data: &[u8]) -> PathBuf {
        let path = self.outbox().join(name);
        fs::write(&path, data).unwrap();
        path
    }
}
