//! Answers receipts that arrive on the file port.

use std::sync::Arc;

use as2_01_pipeline::{PipelineContext, Stage};
use as2_03_mdn::{is_report, AsyncMdnProcessor};
use async_trait::async_trait;
use shared_types::HttpReply;
use tracing::info;

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct HandleAsyncMdn {
    processor: Arc<AsyncMdnProcessor>,
}

impl HandleAsyncMdn {
    pub fn new(processor: Arc<AsyncMdnProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl Stage<ReceiveContext> for HandleAsyncMdn {
    fn name(&self) -> &'static str {
        "handle-async-mdn"
    }

    async fn process(&self, ctx: &mut ReceiveContext) -> Result<(), ReceiveError> {
        let part = ctx.mime_data()?;
        if !is_report(part) {
            return Ok(());
        }

        info!(
            phase = "async-mdn-receive",
            sender = %ctx.message.sender_id,
            "Incoming connection looks like an ASYNC MDN"
        );
        let status = self.processor.process(part)?;
        let (code, text) = status.http_response();
        info!(
            phase = "async-mdn-receive",
            sender = %ctx.message.sender_id,
            status = %status,
            "Async MDN processed"
        );
        ctx.reply = HttpReply::text(code, text);
        ctx.terminate();
        Ok(())
    }
}
