//! Opens the security envelope: decrypt first, then verify.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use async_trait::async_trait;
use shared_crypto::{is_encrypted, is_signed, CertificateStore, CryptoError, SmimeProvider};
use shared_types::constants::header;
use shared_types::disposition::{ERR_DECRYPTION, ERR_INTEGRITY_CHECK};
use shared_types::{DispositionError, MimePart};
use tracing::{debug, error};

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct ExtractMimeData {
    smime: Arc<dyn SmimeProvider>,
    certs: Arc<dyn CertificateStore>,
}

impl ExtractMimeData {
    pub fn new(smime: Arc<dyn SmimeProvider>, certs: Arc<dyn CertificateStore>) -> Self {
        Self { smime, certs }
    }

    fn decrypt(&self, part: &MimePart, receiver_id: &str) -> Result<MimePart, CryptoError> {
        let certificate = self.certs.certificate(receiver_id)?;
        let key = self.certs.private_key(receiver_id)?;
        self.smime.decrypt(part, &certificate, &key)
    }

    fn verify(&self, part: &MimePart, sender_id: &str) -> Result<MimePart, CryptoError> {
        let certificate = self.certs.certificate(sender_id)?;
        self.smime.verify(part, &certificate)
    }
}

#[async_trait]
impl Stage<ReceiveContext> for ExtractMimeData {
    fn name(&self) -> &'static str {
        "extract-mime-data"
    }

    async fn process(&self, ctx: &mut ReceiveContext) -> Result<(), ReceiveError> {
        let sender = ctx.message.sender_id.clone();
        let receiver = ctx.message.receiver_id.clone();
        let content_type = ctx.message.headers.get_or_empty(header::CONTENT_TYPE);
        let mut part = MimePart::from_entity(content_type, std::mem::take(&mut ctx.body));

        if is_encrypted(&part) {
            debug!("[as2-05] Decrypting message from {}", sender);
            part = self.decrypt(&part, &receiver).map_err(|err| {
                error!("[as2-05] Error decrypting message from {}: {}", sender, err);
                DispositionError::error(
                    ERR_DECRYPTION,
                    format!(
                        "The message sent to Recipient {} by {} was received but an error occurred during decryption",
                        receiver, sender
                    ),
                )
            })?;
            ctx.was_protected = true;
        }

        if is_signed(&part) {
            debug!("[as2-05] Verifying signature of {}", sender);
            part = self.verify(&part, &sender).map_err(|err| {
                error!("[as2-05] Error verifying signature of {}: {}", sender, err);
                DispositionError::error(
                    ERR_INTEGRITY_CHECK,
                    format!(
                        "The message sent to Recipient {} by {} was received and decrypted, but the sender's certificate could not be verified",
                        receiver, sender
                    ),
                )
            })?;
            ctx.was_protected = true;
        }

        ctx.mime_data = Some(part);
        Ok(())
    }
}
