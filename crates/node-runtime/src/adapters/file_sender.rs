//! Lets the scheduler drive the send pipeline.

use std::sync::Arc;

use as2_04_file_send::FileSenderService;
use as2_06_scheduler::FileSender;
use async_trait::async_trait;
use shared_types::OutgoingFileMessage;

pub struct FileSenderAdapter {
    service: Arc<FileSenderService>,
}

impl FileSenderAdapter {
    pub fn new(service: Arc<FileSenderService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl FileSender for FileSenderAdapter {
    async fn send_file(&self, message: OutgoingFileMessage) -> OutgoingFileMessage {
        self.service.send(message).await
    }
}
