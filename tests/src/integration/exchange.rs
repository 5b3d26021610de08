//! # File Exchange With a Synchronous Receipt
//!
//! MyCompany posts to PartnerA's file port through reqwest; PartnerA's
//! receive pipeline answers on the same connection.
//!
//! ## Flow
//!
//! 1. send pipeline: MIME body, sign, encrypt, POST
//! 2. receive pipeline: decrypt, verify, save to inbox, signed MDN reply
//! 3. send pipeline: open receipt, compare MIC, archive to `sent/`

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use as2_02_storage::SystemDir;
    use shared_types::{MdnMode, MessageStatus, OutgoingFileMessage};

    use crate::test_utils::{Pair, COMPANY, PARTNER};

    #[tokio::test]
    async fn test_signed_and_encrypted_file_with_sync_mdn() {
        let pair = Pair::start(|s| {
            s.sign_algorithm = "sha256".to_string();
            s.encrypt_algorithm = "aes128".to_string();
            s.mdn_mode = MdnMode::Standard;
        })
        .await;
        let path = pair.company.write_outbox(PARTNER, "order.edi", b"UNB+UNOA:1+MYCO");

        let sent = pair
            .company
            .context()
            .sender
            .send(OutgoingFileMessage::new(&path, COMPANY, PARTNER))
            .await;

        assert_eq!(sent.status, MessageStatus::Sent, "{:?}", sent.error_cause);
        assert!(!path.exists());
        assert!(pair.company.dir(SystemDir::Sent).join("order.edi").exists());
        assert!(pair.company.mdn_count() >= 1);
        assert!(sent.pending_info.is_none());
        for dir in [SystemDir::PendingMdn, SystemDir::PendingMdnInfo] {
            let leftovers = fs::read_dir(pair.company.dir(dir)).unwrap().count();
            assert_eq!(leftovers, 0, "{:?} is not empty", dir);
        }

        let received = pair
            .partner
            .dir(SystemDir::Inbox)
            .join(COMPANY)
            .join("order.edi");
        assert_eq!(fs::read(received).unwrap(), b"UNB+UNOA:1+MYCO");

        let partner_calls = pair.partner.smime.calls();
        assert_eq!(&partner_calls[..2], ["decrypt", "verify"]);
        assert!(partner_calls.contains(&"sign"));
        let company_calls = pair.company.smime.calls();
        assert_eq!(&company_calls[..2], ["sign", "encrypt"]);
        assert!(company_calls.contains(&"verify"));

        pair.stop().await;
    }

    #[tokio::test]
    async fn test_plain_file_without_mdn() {
        let pair = Pair::start(|s| s.mdn_mode = MdnMode::None).await;
        let path = pair.company.write_outbox(PARTNER, "invoice.edi", b"UNB+INVOIC");

        let sent = pair
            .company
            .context()
            .sender
            .send(OutgoingFileMessage::new(&path, COMPANY, PARTNER))
            .await;

        assert_eq!(sent.status, MessageStatus::Sent, "{:?}", sent.error_cause);
        assert_eq!(pair.company.mdn_count(), 0);
        let received = pair
            .partner
            .dir(SystemDir::Inbox)
            .join(COMPANY)
            .join("invoice.edi");
        assert_eq!(fs::read(received).unwrap(), b"UNB+INVOIC");
        assert!(pair.partner.smime.calls().is_empty());

        pair.stop().await;
    }

    #[tokio::test]
    async fn test_partner_offline_keeps_file_in_outbox() {
        let pair = Pair::start(|s| s.mdn_mode = MdnMode::Standard).await;
        pair.partner.runtime.shutdown(Duration::from_secs(5)).await;
        let path = pair.company.write_outbox(PARTNER, "order.edi", b"UNB");

        let sent = pair
            .company
            .context()
            .sender
            .send(OutgoingFileMessage::new(&path, COMPANY, PARTNER))
            .await;

        assert_eq!(sent.status, MessageStatus::Failed);
        assert!(sent.error_cause.is_some());
        assert!(path.exists());
        assert!(!pair.company.dir(SystemDir::Sent).join("order.edi").exists());

        pair.stop().await;
    }
}
