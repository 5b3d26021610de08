//! Per-run state of the send pipeline.

use as2_01_pipeline::PipelineContext;
use shared_types::{MimePart, OutgoingFileMessage, PartnerRecord, TransportResponse};

use crate::domain::errors::SendError;

pub struct SendContext {
    pub message: OutgoingFileMessage,
    /// Agreement for `message.receiver_id`, resolved before the run.
    pub partner: PartnerRecord,
    /// The entity being built; enveloped once `envelope-mime-body` ran.
    pub mime_data: Option<MimePart>,
    /// The partner's answer, dropped by the done handlers.
    pub response: Option<TransportResponse>,
    terminated: bool,
}

impl SendContext {
    pub fn new(message: OutgoingFileMessage, partner: PartnerRecord) -> Self {
        Self {
            message,
            partner,
            mime_data: None,
            response: None,
            terminated: false,
        }
    }

    pub fn mime_data(&self) -> Result<&MimePart, SendError> {
        self.mime_data
            .as_ref()
            .ok_or_else(|| SendError::Validation("no MIME body was built".to_string()))
    }

    pub fn message_id(&self) -> String {
        self.message.message_id.clone()
    }
}

impl PipelineContext for SendContext {
    type Error = SendError;

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn terminate(&mut self) {
        self.terminated = true;
    }
}
