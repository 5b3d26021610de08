//! # Asynchronous Receipts
//!
//! The POST is answered right away; PartnerA posts the signed receipt to
//! the URL advertised in `Receipt-Delivery-Option`, which is MyCompany's
//! MDN port. The pending record is gone once the MIC matched.

#[cfg(test)]
mod tests {
    use std::fs;

    use as2_02_storage::{MessageStore, SystemDir};
    use as2_03_mdn::AsyncMdnProcessor;
    use shared_types::{DispositionType, IncomingMdn, MdnMode, MessageStatus, OutgoingFileMessage};

    use crate::test_utils::{eventually, Pair, COMPANY, PARTNER};

    #[tokio::test]
    async fn test_async_mdn_closes_pending_record() {
        let pair = Pair::start(|s| {
            s.sign_algorithm = "sha1".to_string();
            s.mdn_mode = MdnMode::Async;
        })
        .await;
        let path = pair.company.write_outbox(PARTNER, "orders.edi", b"UNB+ORDERS");
        let context = pair.company.context();

        let sent = context
            .sender
            .send(OutgoingFileMessage::new(&path, COMPANY, PARTNER))
            .await;

        assert_eq!(sent.status, MessageStatus::Pending, "{:?}", sent.error_cause);
        let pending = sent.pending_info.clone().unwrap();
        assert!(!path.exists());

        let storage = context.storage.clone();
        let message_id = sent.message_id.clone();
        assert!(
            eventually(|| storage.load_pending_info(&message_id).is_err()).await,
            "async MDN never arrived"
        );
        assert!(!pending.pending_file.exists());

        let received = pair
            .partner
            .dir(SystemDir::Inbox)
            .join(COMPANY)
            .join("orders.edi");
        assert_eq!(fs::read(received).unwrap(), b"UNB+ORDERS");

        pair.stop().await;
    }

    #[tokio::test]
    async fn test_duplicate_receipt_finds_no_pending_record() {
        let pair = Pair::start(|s| s.mdn_mode = MdnMode::Async).await;
        let path = pair.company.write_outbox(PARTNER, "orders.edi", b"UNB");
        let context = pair.company.context();

        let sent = context
            .sender
            .send(OutgoingFileMessage::new(&path, COMPANY, PARTNER))
            .await;
        assert_eq!(sent.status, MessageStatus::Pending, "{:?}", sent.error_cause);

        // Receipt arrives first, then a duplicate finds no record left.
        let storage = context.storage.clone();
        let message_id = sent.message_id.clone();
        assert!(eventually(|| storage.load_pending_info(&message_id).is_err()).await);

        let processor = AsyncMdnProcessor::new(context.storage.clone());
        let status = processor.correlate(&duplicate_of(&sent));
        assert_eq!(
            status.http_response(),
            (404, "No pending MDN found for the original message")
        );

        pair.stop().await;
    }

    fn duplicate_of(sent: &OutgoingFileMessage) -> IncomingMdn {
        let mut mdn = IncomingMdn::default();
        mdn.attributes.original_message_id = sent.message_id.clone();
        mdn.attributes.content_disposition = DispositionType::success().to_string();
        mdn.attributes.received_content_mic = sent.outgoing_mic.clone();
        mdn
    }
}
