//! What happens after the partner accepted the POST, per MDN mode.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use as2_02_storage::MessageStore;
use as2_03_mdn::{open_signed, parse_report, validate_mdn_disposition, validate_mdn_mic};
use async_trait::async_trait;
use shared_crypto::{CertificateStore, SmimeProvider};
use shared_types::constants::header;
use shared_types::{MdnDirection, MdnDocument, MdnMode, MessageStatus, MimePart};
use tracing::{info, warn};

use crate::domain::context::SendContext;
use crate::domain::errors::SendError;

pub struct ReceiveMdn {
    storage: Arc<dyn MessageStore>,
    smime: Arc<dyn SmimeProvider>,
    certs: Arc<dyn CertificateStore>,
}

impl ReceiveMdn {
    pub fn new(
        storage: Arc<dyn MessageStore>,
        smime: Arc<dyn SmimeProvider>,
        certs: Arc<dyn CertificateStore>,
    ) -> Self {
        Self {
            storage,
            smime,
            certs,
        }
    }

    /// Moves the file aside and records the MIC the async receipt must echo.
    fn await_async(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let message = &mut ctx.message;
        let info = self.storage.save_pending_info(
            &message.message_id,
            &message.file_path,
            &message.outgoing_mic,
        )?;
        info!(
            phase = "mdn-receive",
            message_id = %message.message_id,
            pending_file = %info.pending_file.display(),
            "Waiting for async MDN"
        );
        message.pending_info = Some(info);
        message.status = MessageStatus::Pending;
        Ok(())
    }

    /// Opens, stores and checks the receipt returned on the connection.
    fn check_sync(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let response = ctx.response.as_ref().ok_or(SendError::EmptyMdn)?;
        if response.body.is_empty() {
            return Err(SendError::EmptyMdn);
        }

        let content_type = response.headers.get_or_empty(header::CONTENT_TYPE);
        let part = MimePart::from_entity(content_type, response.body.clone());
        let signer = response
            .headers
            .get_non_blank(header::AS2_FROM)
            .unwrap_or(ctx.message.receiver_id.as_str())
            .trim()
            .to_string();
        let report = open_signed(part, &signer, self.smime.as_ref(), self.certs.as_ref())?;
        let mdn = parse_report(&report)?;

        let message = &ctx.message;
        self.storage.save_mdn(
            &message.message_id,
            &MdnDocument {
                direction: MdnDirection::Received,
                partner_id: message.receiver_id.clone(),
                company_id: message.sender_id.clone(),
                body_text: mdn.body_text.clone(),
                attributes: mdn.attributes.clone(),
            },
        )?;
        info!(
            phase = "mdn-receive",
            message_id = %message.message_id,
            disposition = %mdn.attributes.content_disposition,
            "MDN received"
        );

        validate_mdn_disposition(&mdn)?;
        validate_mdn_mic(&message.outgoing_mic, &mdn)?;

        self.archive(ctx);
        Ok(())
    }

    /// The file is done with; a failed move leaves it in the outbox.
    fn archive(&self, ctx: &mut SendContext) {
        let message = &mut ctx.message;
        match self.storage.archive_sent_file(&message.file_path) {
            Ok(path) => info!(
                message_id = %message.message_id,
                path = %path.display(),
                "[as2-04] File archived"
            ),
            Err(err) => warn!(
                message_id = %message.message_id,
                error = %err,
                "[as2-04] Sent file could not be archived"
            ),
        }
        message.status = MessageStatus::Sent;
    }
}

#[async_trait]
impl Stage<SendContext> for ReceiveMdn {
    fn name(&self) -> &'static str {
        "receive-mdn"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        match ctx.partner.send_settings.mdn_mode {
            MdnMode::Async => self.await_async(ctx),
            MdnMode::Standard => self.check_sync(ctx),
            MdnMode::None => {
                info!(
                    message_id = %ctx.message.message_id,
                    "[as2-04] No MDN requested"
                );
                self.archive(ctx);
                Ok(())
            }
        }
    }
}
