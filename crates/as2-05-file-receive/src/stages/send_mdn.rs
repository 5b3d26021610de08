//! Builds the receipt for a stored file and sends it the way it was asked for.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use as2_02_storage::MessageStore;
use as2_03_mdn::{create_reply_mdn, AsyncMdnSender, ReplyMdn, ReplyRenderer};
use async_trait::async_trait;
use shared_crypto::calculate_mic;
use shared_types::disposition::ERR_UNEXPECTED;
use shared_types::{
    DispositionError, DispositionType, HttpReply, MdnMode, MimePart, PartnerDirectory,
};
use tracing::{error, info, warn};

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct SendMdn {
    partners: Arc<dyn PartnerDirectory>,
    storage: Arc<dyn MessageStore>,
    renderer: ReplyRenderer,
    sender: Arc<AsyncMdnSender>,
}

impl SendMdn {
    pub fn new(
        partners: Arc<dyn PartnerDirectory>,
        storage: Arc<dyn MessageStore>,
        renderer: ReplyRenderer,
        sender: Arc<AsyncMdnSender>,
    ) -> Self {
        Self {
            partners,
            storage,
            renderer,
            sender,
        }
    }

    fn record(&self, mdn: &ReplyMdn) {
        if let Err(err) = self
            .storage
            .save_mdn(mdn.original_message_id(), &mdn.to_document())
        {
            error!(
                "[as2-05] Could not store MDN for {}: {}",
                mdn.original_message_id(),
                err
            );
        }
    }
}

/// RFC 4130: headers are part of the digest once the content was signed
/// or encrypted.
fn received_content_mic(
    part: &MimePart,
    algorithm: &str,
    was_protected: bool,
) -> Result<String, DispositionError> {
    calculate_mic(part, algorithm, was_protected).map_err(|err| {
        error!("[as2-05] Unable to calculate MIC with {}: {}", algorithm, err);
        DispositionError::error(ERR_UNEXPECTED, "Unable to calculate the MIC for your message")
    })
}

#[async_trait]
impl Stage<ReceiveContext> for SendMdn {
    fn name(&self) -> &'static str {
        "send-mdn"
    }

    async fn process(&self, ctx: &mut ReceiveContext) -> Result<(), ReceiveError> {
        let Some(file_message) = ctx.file_message.as_ref() else {
            return Err(DispositionError::error(ERR_UNEXPECTED, "No file was stored").into());
        };
        let mode = file_message.message.mdn_mode;
        info!("[as2-05] Sending MDN (mode = {})", mode);

        if mode == MdnMode::None {
            ctx.reply = HttpReply::text(200, "File Received Ok, NO MDN was requested");
            return Ok(());
        }

        let sender_id = &file_message.message.sender_id;
        let email = match self.partners.partner(sender_id) {
            Some(partner) => partner.email,
            None => {
                warn!("[as2-05] No partner record for {}, MDN has no From", sender_id);
                String::new()
            }
        };

        let mut mdn = create_reply_mdn(file_message, &DispositionType::success(), &email)?;
        if !mdn.mic_algorithm.trim().is_empty() {
            mdn.attributes.received_content_mic =
                received_content_mic(ctx.mime_data()?, &mdn.mic_algorithm, ctx.was_protected)?;
        }

        self.record(&mdn);
        match mode {
            MdnMode::Async => {
                info!(
                    phase = "async-mdn-send",
                    message_id = %mdn.original_message_id(),
                    url = %mdn.async_reply_to_url,
                    "Sender requested an ASYNC MDN"
                );
                self.sender.spawn(mdn);
                ctx.reply = HttpReply::default();
            }
            _ => ctx.reply = self.renderer.http_reply(&mdn),
        }
        Ok(())
    }
}
