//! Failure handler turning the error into the HTTP answer.

use as2_01_pipeline::FailureStage;
use async_trait::async_trait;
use shared_types::HttpReply;

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct SetResponseError;

#[async_trait]
impl FailureStage<ReceiveContext> for SetResponseError {
    fn name(&self) -> &'static str {
        "set-response-error"
    }

    async fn process(
        &self,
        ctx: &mut ReceiveContext,
        error: &ReceiveError,
    ) -> Result<(), ReceiveError> {
        ctx.reply = HttpReply::text(error.http_status(), error.to_string());
        Ok(())
    }
}
