//! Posts receipts to the partner's `Receipt-Delivery-Option` URL.

use std::sync::Arc;

use shared_types::constants::is_success_status;
use shared_types::{HttpTransport, OutboundRequest};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::domain::errors::MdnError;
use crate::domain::reply::ReplyMdn;
use crate::service::renderer::ReplyRenderer;

pub struct AsyncMdnSender {
    renderer: ReplyRenderer,
    transport: Arc<dyn HttpTransport>,
}

impl AsyncMdnSender {
    pub fn new(renderer: ReplyRenderer, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            renderer,
            transport,
        }
    }

    /// Sends `mdn` and waits for the partner's answer.
    ///
    /// # Errors
    ///
    /// - `Options`: the reply has no delivery URL
    /// - `Transport`: the POST could not be made
    /// - `Rejected`: the partner answered with a non-2xx status
    pub async fn send(&self, mdn: &ReplyMdn) -> Result<(), MdnError> {
        let url = mdn.async_reply_to_url.trim();
        if url.is_empty() {
            return Err(MdnError::Options(shared_types::As2Error::new(
                "No Receipt-Delivery-Option URL for async MDN",
            )));
        }

        let reply = self.renderer.http_reply(mdn);
        debug!(
            url = %url,
            bytes = reply.body.len(),
            content_type = %reply.headers.get_or_empty("Content-Type"),
            original_message_id = %mdn.original_message_id(),
            "[as2-03] Async MDN POST prepared"
        );

        let response = self
            .transport
            .post(OutboundRequest {
                url: url.to_string(),
                headers: reply.headers,
                body: reply.body,
            })
            .await?;

        if !is_success_status(response.status) {
            return Err(MdnError::Rejected {
                url: url.to_string(),
                status: response.status,
            });
        }
        Ok(())
    }

    /// Sends `mdn` on a detached task; the outcome is only logged.
    pub fn spawn(self: &Arc<Self>, mdn: ReplyMdn) -> JoinHandle<()> {
        let sender = Arc::clone(self);
        tokio::spawn(async move {
            let message_id = mdn.original_message_id().to_string();
            info!(phase = "async-mdn-send", message_id = %message_id, "Starting to send Async MDN");
            match sender.send(&mdn).await {
                Ok(()) => info!(
                    phase = "async-mdn-send",
                    message_id = %message_id,
                    "Async MDN sent successfully"
                ),
                Err(err) => error!(
                    phase = "async-mdn-send",
                    message_id = %message_id,
                    error = %err,
                    "Error sending async MDN"
                ),
            }
        })
    }
}
