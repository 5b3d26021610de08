//! Per-run state of the receive pipeline.

use as2_01_pipeline::PipelineContext;
use shared_types::disposition::ERR_UNEXPECTED;
use shared_types::{DispositionError, HttpReply, IncomingFileMessage, IncomingMessage, MimePart};

use crate::domain::errors::ReceiveError;

pub struct ReceiveContext {
    pub message: IncomingMessage,
    /// Raw request entity; moved into `mime_data` by extraction.
    pub body: Vec<u8>,
    /// The entity with any envelope removed.
    pub mime_data: Option<MimePart>,
    /// Set when the entity was encrypted or signed.
    pub was_protected: bool,
    pub file_message: Option<IncomingFileMessage>,
    /// What goes back on the connection.
    pub reply: HttpReply,
    terminated: bool,
}

impl ReceiveContext {
    pub fn new(message: IncomingMessage, body: Vec<u8>) -> Self {
        Self {
            message,
            body,
            mime_data: None,
            was_protected: false,
            file_message: None,
            reply: HttpReply::default(),
            terminated: false,
        }
    }

    pub fn mime_data(&self) -> Result<&MimePart, ReceiveError> {
        self.mime_data
            .as_ref()
            .ok_or_else(|| {
                DispositionError::error(ERR_UNEXPECTED, "Request entity was not extracted").into()
            })
    }

    pub fn message_id(&self) -> String {
        self.message.message_id.clone()
    }
}

impl PipelineContext for ReceiveContext {
    type Error = ReceiveError;

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn terminate(&mut self) {
        self.terminated = true;
    }
}
