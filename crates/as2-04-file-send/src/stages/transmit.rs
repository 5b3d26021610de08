//! The HTTP POST to the partner.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use async_trait::async_trait;
use shared_types::constants::is_success_status;
use shared_types::{HttpTransport, OutboundRequest};
use tracing::{debug, info};

use crate::domain::context::SendContext;
use crate::domain::errors::SendError;
use crate::domain::headers::{build_request_headers, SendConfig};

pub struct TransmitFile {
    transport: Arc<dyn HttpTransport>,
    config: SendConfig,
}

impl TransmitFile {
    pub fn new(transport: Arc<dyn HttpTransport>, config: SendConfig) -> Self {
        Self { transport, config }
    }
}

#[async_trait]
impl Stage<SendContext> for TransmitFile {
    fn name(&self) -> &'static str {
        "transmit-file"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let url = ctx.partner.send_settings.url.clone();
        let headers = build_request_headers(&ctx.message, &ctx.partner, &self.config);
        let body = ctx.mime_data()?.body().to_vec();

        info!(
            message_id = %ctx.message.message_id,
            partner = %ctx.message.receiver_id,
            url = %url,
            bytes = body.len(),
            "[as2-04] Sending file"
        );

        let response = self
            .transport
            .post(OutboundRequest {
                url: url.clone(),
                headers,
                body,
            })
            .await?;
        let status = response.status;
        debug!(
            message_id = %ctx.message.message_id,
            status,
            "[as2-04] Partner answered"
        );
        ctx.response = Some(response);

        if !is_success_status(status) {
            return Err(SendError::Rejected { url, status });
        }
        Ok(())
    }
}
