//! The file sender service: resolves the partner and runs the pipeline.

use std::sync::Arc;

use as2_01_pipeline::{Phase, Pipeline, ServerEventStage};
use as2_02_storage::MessageStore;
use shared_crypto::{CertificateStore, SmimeProvider};
use shared_types::{HttpTransport, MessageStatus, OutgoingFileMessage, PartnerDirectory};
use tracing::error;

use crate::domain::context::SendContext;
use crate::domain::errors::SendError;
use crate::domain::headers::SendConfig;
use crate::stages::{
    CloseResponse, CreateMimeBody, EnvelopeMimeBody, ReceiveMdn, RecordSendError, TransmitFile,
    ValidateMessage,
};

/// Collaborators of the send pipeline.
pub struct SenderDependencies {
    pub partners: Arc<dyn PartnerDirectory>,
    pub storage: Arc<dyn MessageStore>,
    pub smime: Arc<dyn SmimeProvider>,
    pub certs: Arc<dyn CertificateStore>,
    pub transport: Arc<dyn HttpTransport>,
    pub config: SendConfig,
}

pub struct FileSenderService {
    partners: Arc<dyn PartnerDirectory>,
    pipeline: Pipeline<SendContext>,
}

fn message_id(ctx: &SendContext) -> String {
    ctx.message_id()
}

impl FileSenderService {
    pub fn new(deps: SenderDependencies) -> Self {
        let pipeline = Pipeline::new("file-send")
            .step(ServerEventStage::new(
                Phase::FileSend,
                "Starting to send file",
                message_id,
            ))
            .step(CreateMimeBody)
            .step(EnvelopeMimeBody::new(deps.smime.clone(), deps.certs.clone()))
            .step(ValidateMessage)
            .step(TransmitFile::new(deps.transport, deps.config))
            .step(ReceiveMdn::new(deps.storage, deps.smime, deps.certs))
            .done(CloseResponse)
            .done(ServerEventStage::new(
                Phase::FileSend,
                "File Send Finished",
                message_id,
            ))
            .fail(ServerEventStage::new(
                Phase::FileSend,
                "Error Sending File",
                message_id,
            ))
            .fail(RecordSendError);
        Self {
            partners: deps.partners,
            pipeline,
        }
    }

    pub fn pipeline(&self) -> &Pipeline<SendContext> {
        &self.pipeline
    }

    /// Sends one file and returns the message with its final status.
    ///
    /// Never fails as such: a failed attempt comes back with
    /// `status == Failed` and `error_cause` set, and the file stays where
    /// it was.
    pub async fn send(&self, mut message: OutgoingFileMessage) -> OutgoingFileMessage {
        let Some(partner) = self.partners.partner(&message.receiver_id) else {
            let err = SendError::UnknownPartner(message.receiver_id.clone());
            error!(
                phase = %Phase::FileSend,
                message_id = %message.message_id,
                error = %err,
                "Error Sending File"
            );
            message.status = MessageStatus::Failed;
            message.error_cause = Some(err.to_string());
            return message;
        };

        let mut ctx = SendContext::new(message, partner);
        self.pipeline.run(&mut ctx).await;
        ctx.message
    }
}
