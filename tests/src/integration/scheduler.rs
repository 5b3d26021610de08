//! # Outbox Pickup
//!
//! A file dropped into `outbox/PartnerA` is seen by the poller, waits out
//! the debounce window and is sent by the next flush.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use as2_02_storage::SystemDir;
    use as2_06_scheduler::{
        FlushOutcome, SchedulerApi, WatchStatus, NEW_FILE_DEBOUNCE_MS, RESEND_BACKOFF_MS,
    };
    use shared_types::MdnMode;

    use crate::test_utils::{Pair, COMPANY, PARTNER, START};

    #[tokio::test]
    async fn test_outbox_file_is_sent_after_debounce() {
        let pair = Pair::start(|s| {
            s.sign_algorithm = "sha256".to_string();
            s.mdn_mode = MdnMode::Standard;
        })
        .await;
        let context = pair.company.context();
        let path = pair.company.write_outbox(PARTNER, "desadv.edi", b"UNB+DESADV");

        context.scheduler.poll();
        let files = context.scheduler.watched_files();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, WatchStatus::New);

        // Still inside the debounce window.
        assert_eq!(
            context.scheduler.flush().await,
            FlushOutcome::Completed { sent: 0, failed: 0 }
        );
        assert!(path.exists());

        pair.company.time.advance(NEW_FILE_DEBOUNCE_MS);
        assert_eq!(
            context.scheduler.flush().await,
            FlushOutcome::Completed { sent: 1, failed: 0 }
        );

        assert!(!path.exists());
        assert!(context.scheduler.watched_files().is_empty());
        assert!(pair.company.dir(SystemDir::Sent).join("desadv.edi").exists());
        let received = pair
            .partner
            .dir(SystemDir::Inbox)
            .join(COMPANY)
            .join("desadv.edi");
        assert_eq!(fs::read(received).unwrap(), b"UNB+DESADV");

        pair.stop().await;
    }

    #[tokio::test]
    async fn test_failed_send_waits_for_manual_resend() {
        let pair = Pair::start(|s| s.mdn_mode = MdnMode::Standard).await;
        pair.partner.runtime.shutdown(Duration::from_secs(5)).await;
        let context = pair.company.context();
        let path = pair.company.write_outbox(PARTNER, "order.edi", b"UNB");

        context.scheduler.poll();
        pair.company.time.advance(NEW_FILE_DEBOUNCE_MS);
        assert_eq!(
            context.scheduler.flush().await,
            FlushOutcome::Completed { sent: 0, failed: 1 }
        );
        assert!(path.exists());
        assert_eq!(context.scheduler.watched_files()[0].status, WatchStatus::Send);

        // No automatic retry.
        pair.company.time.advance(RESEND_BACKOFF_MS * 4);
        assert_eq!(
            context.scheduler.flush().await,
            FlushOutcome::Completed { sent: 0, failed: 0 }
        );

        let record = context.scheduler.resend_file(&path).unwrap();
        assert_eq!(record.status, WatchStatus::Resend);
        assert_eq!(record.retries, 1);
        assert_eq!(
            record.eligible_at,
            START + NEW_FILE_DEBOUNCE_MS + RESEND_BACKOFF_MS * 5
        );

        pair.stop().await;
    }
}
