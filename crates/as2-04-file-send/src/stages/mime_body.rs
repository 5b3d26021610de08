//! Building, enveloping and checking the entity to send.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use async_trait::async_trait;
use shared_crypto::{calculate_mic, CertificateStore, SmimeProvider};
use shared_types::constants::header;
use shared_types::{DispositionOptions, Headers, MimePart};
use tracing::debug;

use crate::domain::context::SendContext;
use crate::domain::errors::SendError;

/// MIC algorithm when the agreement names no MDN options.
const DEFAULT_MIC_ALGORITHM: &str = "sha1";

/// Reads the file into a part typed per the partner agreement.
pub struct CreateMimeBody;

#[async_trait]
impl Stage<SendContext> for CreateMimeBody {
    fn name(&self) -> &'static str {
        "create-mime-body"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let path = &ctx.message.file_path;
        let data = tokio::fs::read(path).await.map_err(|e| SendError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let settings = &ctx.partner.send_settings;
        let mut headers = Headers::new();
        headers.set(header::CONTENT_TYPE, settings.content_type.as_str());
        headers.set(
            header::CONTENT_TRANSFER_ENCODING,
            settings.transfer_encoding.as_str(),
        );
        headers.set(
            header::CONTENT_DISPOSITION,
            format!("Attachment; filename=\"{}\"", ctx.message.file_name),
        );

        debug!(
            message_id = %ctx.message.message_id,
            bytes = data.len(),
            "[as2-04] MIME body created"
        );
        ctx.mime_data = Some(MimePart::new(headers, data));
        Ok(())
    }
}

/// Signs, then encrypts, as the agreement asks, and records the outgoing MIC.
pub struct EnvelopeMimeBody {
    smime: Arc<dyn SmimeProvider>,
    certs: Arc<dyn CertificateStore>,
}

impl EnvelopeMimeBody {
    pub fn new(smime: Arc<dyn SmimeProvider>, certs: Arc<dyn CertificateStore>) -> Self {
        Self { smime, certs }
    }
}

#[async_trait]
impl Stage<SendContext> for EnvelopeMimeBody {
    fn name(&self) -> &'static str {
        "envelope-mime-body"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let content = ctx.mime_data()?;
        let settings = &ctx.partner.send_settings;
        let sign = ctx.partner.should_sign();
        let encrypt = ctx.partner.should_encrypt();

        let mic_algorithm = if settings.mdn_options.trim().is_empty() {
            DEFAULT_MIC_ALGORITHM.to_string()
        } else {
            DispositionOptions::parse(&settings.mdn_options)?.mic_algorithm
        };
        let outgoing_mic = calculate_mic(content, &mic_algorithm, sign || encrypt)?;

        let mut part = content.clone();
        if sign {
            let sender = &ctx.message.sender_id;
            let certificate = self.certs.certificate(sender)?;
            let key = self.certs.private_key(sender)?;
            part = self
                .smime
                .sign(&part, &certificate, &key, &settings.sign_algorithm)?;
            debug!("[as2-04] Signed with {} for {}", settings.sign_algorithm, sender);
        }
        if encrypt {
            let receiver = &ctx.message.receiver_id;
            let certificate = self.certs.certificate(receiver)?;
            part = self
                .smime
                .encrypt(&part, &certificate, &settings.encrypt_algorithm)?;
            debug!(
                "[as2-04] Encrypted with {} for {}",
                settings.encrypt_algorithm, receiver
            );
        }

        ctx.message.content_type = part.content_type_value().to_string();
        ctx.message.disposition_options = settings.mdn_options.clone();
        ctx.message.outgoing_mic = outgoing_mic;
        ctx.mime_data = Some(part);
        Ok(())
    }
}

/// Refuses to send a message missing any of the fields a partner needs.
pub struct ValidateMessage;

#[async_trait]
impl Stage<SendContext> for ValidateMessage {
    fn name(&self) -> &'static str {
        "validate-message"
    }

    async fn process(&self, ctx: &mut SendContext) -> Result<(), SendError> {
        let message = &ctx.message;
        let required = [
            ("Content Type", &message.content_type),
            ("Outgoing MIC", &message.outgoing_mic),
            ("Sender ID", &message.sender_id),
            ("Receiver ID", &message.receiver_id),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(SendError::Validation(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}
