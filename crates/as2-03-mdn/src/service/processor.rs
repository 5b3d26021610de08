//! Correlates an incoming asynchronous MDN with the send it acknowledges.
//!
//! Used by the async MDN listener and by the file receive pipeline, since
//! some partners post async MDNs to the file port instead of the URL we
//! gave them.

use std::sync::Arc;

use as2_02_storage::MessageStore;
use shared_crypto::validate_returned_mic;
use shared_types::{DispositionType, IncomingMdn, MdnReceiveStatus, MimePart};
use tracing::{debug, error, info, warn};

use crate::domain::errors::MdnError;
use crate::domain::report::parse_report;

pub struct AsyncMdnProcessor {
    store: Arc<dyn MessageStore>,
}

impl AsyncMdnProcessor {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    /// Parses `report` and correlates it.
    ///
    /// # Errors
    ///
    /// `MdnError` when the report is malformed; a report without a
    /// notification part is `NO_CONTENT`, not an error.
    pub fn process(&self, report: &MimePart) -> Result<MdnReceiveStatus, MdnError> {
        match parse_report(report) {
            Ok(mdn) => Ok(self.correlate(&mdn)),
            Err(MdnError::MissingNotification) => {
                warn!("[as2-03] No MDN found in incoming request");
                Ok(MdnReceiveStatus::NoContent)
            }
            Err(err) => Err(err),
        }
    }

    /// Judges an already parsed MDN against its pending record.
    pub fn correlate(&self, mdn: &IncomingMdn) -> MdnReceiveStatus {
        let attributes = &mdn.attributes;
        let message_id = attributes.original_message_id.as_str();

        let disposition = DispositionType::parse(&attributes.content_disposition);
        if !disposition.is_format_valid() {
            debug!(
                "[as2-03] Invalid disposition {:?} for {}",
                attributes.content_disposition, message_id
            );
            return MdnReceiveStatus::InvalidDisposition;
        }
        if !disposition.is_success() {
            info!(
                "[as2-03] Partner reports processing failed for {}: {}",
                message_id, disposition
            );
            return MdnReceiveStatus::ProcessingFailed;
        }

        let pending = match self.store.load_pending_info(message_id) {
            Ok(pending) => pending,
            Err(err) => {
                error!(
                    "[as2-03] Error loading pending MDN info for {}, maybe already received? {}",
                    message_id, err
                );
                return MdnReceiveStatus::AsyncLoadError;
            }
        };

        if !validate_returned_mic(&pending.outgoing_mic, &attributes.received_content_mic) {
            return MdnReceiveStatus::MicNotMatched;
        }

        // Cleanup only; the MDN is already accepted.
        match self.store.delete_pending_info(message_id) {
            Ok(_) => debug!("[as2-03] Pending MDN info removed for {}", message_id),
            Err(err) => error!(
                "[as2-03] Could not remove pending MDN info for {}: {}",
                message_id, err
            ),
        }

        info!("[as2-03] Async MDN accepted for {}", message_id);
        MdnReceiveStatus::Ok
    }
}
