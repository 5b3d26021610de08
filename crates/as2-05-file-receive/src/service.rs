//! The file receiver service: one pipeline run per inbound request.

use std::sync::Arc;

use as2_01_pipeline::{Phase, Pipeline, ServerEventStage};
use as2_02_storage::MessageStore;
use as2_03_mdn::{AsyncMdnProcessor, AsyncMdnSender, ReplyRenderer};
use shared_crypto::{CertificateStore, SmimeProvider};
use shared_types::{ConnectionInfo, Headers, HttpReply, IncomingMessage, PartnerDirectory};
use tracing::debug;

use crate::domain::context::ReceiveContext;
use crate::stages::{
    ExtractMimeData, HandleAsyncMdn, HandleFile, SendMdn, SetResponseError, ValidateRequest,
};

/// Collaborators of the receive pipeline.
pub struct ReceiverDependencies {
    pub partners: Arc<dyn PartnerDirectory>,
    pub storage: Arc<dyn MessageStore>,
    pub smime: Arc<dyn SmimeProvider>,
    pub certs: Arc<dyn CertificateStore>,
    pub processor: Arc<AsyncMdnProcessor>,
    pub mdn_sender: Arc<AsyncMdnSender>,
}

pub struct FileReceiverService {
    pipeline: Pipeline<ReceiveContext>,
}

fn message_id(ctx: &ReceiveContext) -> String {
    ctx.message_id()
}

impl FileReceiverService {
    pub fn new(deps: ReceiverDependencies) -> Self {
        let renderer = ReplyRenderer::new(deps.smime.clone(), deps.certs.clone());
        let pipeline = Pipeline::new("file-receive")
            .step(ServerEventStage::new(
                Phase::FileReceive,
                "Starting file receive",
                message_id,
            ))
            .step(ValidateRequest)
            .step(ExtractMimeData::new(deps.smime, deps.certs))
            .step(HandleAsyncMdn::new(deps.processor))
            .step(HandleFile::new(deps.storage.clone()))
            .step(SendMdn::new(
                deps.partners,
                deps.storage,
                renderer,
                deps.mdn_sender,
            ))
            .done(ServerEventStage::new(
                Phase::FileReceive,
                "File receive finished",
                message_id,
            ))
            .fail(SetResponseError)
            .fail(ServerEventStage::new(
                Phase::FileReceive,
                "Error receiving file",
                message_id,
            ));
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &Pipeline<ReceiveContext> {
        &self.pipeline
    }

    /// Runs the pipeline over one request and returns the answer to write.
    pub async fn handle(
        &self,
        connection: ConnectionInfo,
        headers: Headers,
        body: Vec<u8>,
    ) -> HttpReply {
        let mut ctx = ReceiveContext::new(IncomingMessage::new(connection, headers), body);
        let outcome = self.pipeline.run(&mut ctx).await;
        debug!(
            message_id = %ctx.message.message_id,
            completed = outcome.is_completed(),
            status = ctx.reply.status,
            "[as2-05] Receive finished"
        );
        ctx.reply
    }
}
