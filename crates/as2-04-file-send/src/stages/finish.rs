//! Handlers that run after the main stages.

use as2_01_pipeline::{FailureStage, Stage};
use async_trait::async_trait;
use shared_types::MessageStatus;
use tracing::{debug, info};

use crate::domain::context::SendContext;
use crate::domain::errors::SendError;

/// Drops the partner's response, whatever happened.
pub struct CloseResponse;

#[async_trait]
impl Stage<SendContext> for CloseResponse {
    fn name(&self) -> &'static str {
        "close-response"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        if let Some(response) = ctx.response.take() {
            debug!(
                message_id = %ctx.message.message_id,
                status = response.status,
                "[as2-04] Response closed"
            );
        }
        info!(
            message_id = %ctx.message.message_id,
            status = %ctx.message.status,
            "[as2-04] Send finished"
        );
        Ok(())
    }
}

/// Marks the message failed so the caller can see why.
pub struct RecordSendError;

#[async_trait]
impl FailureStage<SendContext> for RecordSendError {
    fn name(&self) -> &'static str {
        "record-send-error"
    }

    async fn process(&self, ctx: &mut SendContext, error: &SendError) -> Result<(), SendError> {
        ctx.message.status = MessageStatus::Failed;
        ctx.message.error_cause = Some(error.to_string());
        Ok(())
    }
}
