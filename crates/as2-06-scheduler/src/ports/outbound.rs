//! Outbound (Driven) ports for the scheduler.

use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use shared_types::OutgoingFileMessage;

use crate::domain::entities::Timestamp;

/// Runs one file through the send pipeline and waits for it to finish.
///
/// The returned message carries the outcome: `status == Failed` with
/// `error_cause` set when the attempt did not go through.
#[async_trait]
pub trait FileSender: Send + Sync {
    async fn send_file(&self, message: OutgoingFileMessage) -> OutgoingFileMessage;
}

/// Wall clock, in milliseconds, used for debounce and resend eligibility.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp::try_from(since_epoch.as_millis()).unwrap_or(Timestamp::MAX)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use manual::MockTimeSource;

#[cfg(any(test, feature = "test-utils"))]
mod manual {
    use std::sync::atomic::{AtomicU64, Ordering};

    use super::TimeSource;
    use crate::domain::entities::Timestamp;

    /// A clock that only moves when told to.
    #[derive(Debug)]
    pub struct MockTimeSource {
        millis: AtomicU64,
    }

    impl MockTimeSource {
        pub fn new(start: Timestamp) -> Self {
            Self {
                millis: AtomicU64::new(start),
            }
        }

        pub fn advance(&self, ms: u64) {
            self.millis.fetch_add(ms, Ordering::SeqCst);
        }

        pub fn set(&self, at: Timestamp) {
            self.millis.store(at, Ordering::SeqCst);
        }
    }

    impl TimeSource for MockTimeSource {
        fn now(&self) -> Timestamp {
            self.millis.load(Ordering::SeqCst)
        }
    }
}
