//! Stores the payload of a file message.

use std::sync::Arc;

use as2_01_pipeline::Stage;
use as2_02_storage::MessageStore;
use async_trait::async_trait;
use shared_types::constants::header;
use shared_types::disposition::ERR_UNEXPECTED;
use shared_types::mime::disposition_filename;
use shared_types::{DispositionError, IncomingFileMessage};
use tracing::{debug, error, info};

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct HandleFile {
    storage: Arc<dyn MessageStore>,
}

impl HandleFile {
    pub fn new(storage: Arc<dyn MessageStore>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl Stage<ReceiveContext> for HandleFile {
    fn name(&self) -> &'static str {
        "handle-file"
    }

    async fn process(&self, ctx: &mut ReceiveContext) -> Result<(), ReceiveError> {
        info!("[as2-05] Incoming connection looks like a FILE");
        let part = ctx.mime_data()?;
        let mut file_message = IncomingFileMessage::new(ctx.message.clone());

        // The envelope protects the part's own headers; the HTTP ones are
        // only trusted for unprotected messages.
        let content_disposition = if ctx.was_protected {
            part.header(header::CONTENT_DISPOSITION)
        } else {
            ctx.message.header(header::CONTENT_DISPOSITION)
        };
        match content_disposition.and_then(disposition_filename) {
            Some(name) => file_message.file_name = name,
            None => debug!("[as2-05] No file name given, using the message id"),
        }
        info!("[as2-05] Setting incoming file name to: {}", file_message.file_name);

        let saved = self
            .storage
            .save_incoming_file(
                &file_message.message.sender_id,
                &file_message.file_name,
                part.body(),
            )
            .map_err(|err| {
                error!("[as2-05] Error saving incoming file: {}", err);
                DispositionError::error(
                    ERR_UNEXPECTED,
                    format!(
                        "The message from {} to {} was decrypted and verified, but an error occurred saving the file.",
                        file_message.message.sender_id, file_message.message.receiver_id
                    ),
                )
            })?;
        file_message.saved_path = Some(saved);
        ctx.file_message = Some(file_message);
        Ok(())
    }
}
