//! # Outbox Scheduler (as2-06)
//!
//! Watches partner outbox directories and hands files that have settled to
//! the send pipeline, one at a time.
//!
//! ## Record Lifecycle
//!
//! ```text
//!   created ──→ [NEW] ──flush, eligible──→ [SEND] ──sent──→ (removed)
//!                 │ ↑                         │
//!          changed: eligible_at = now + 15s   └── failed: stays SEND
//!                                                   │
//!                              resend_file ──→ [RESEND] ──flush, eligible──→ [SEND]
//!                              retries += 1, eligible_at = now + 15min × retries
//! ```
//!
//! A deleted file drops its record whatever the status.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | A new file waits out the 15 s debounce | `WatchedFile::new()`, `WatchRegistry::observe()` |
//! | 2 | Only one flush runs at a time; extra flush signals are dropped | `FlushGuard` |
//! | 3 | One file in flight, oldest eligible first | `WatchRegistry::take_next()` |
//! | 4 | Failed sends are never retried by the scheduler itself | `flush()` leaves them at `SEND` |
//! | 5 | Resend backoff grows linearly and is uncapped | `WatchedFile::schedule_resend()` |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - `WatchedDir`, `WatchedFile`, `WatchRegistry`, errors, config
//! - `ports/inbound.rs` - `SchedulerApi`
//! - `ports/outbound.rs` - `FileSender`, `TimeSource`
//! - `adapters/observer.rs` - `DirectoryObserver`, snapshot-based change detection
//! - `service.rs` - `DirectoryPollingService` and its poll/flush loop

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::observer::{DirectoryObserver, FileEvent};
pub use domain::config::SchedulerConfig;
pub use domain::entities::{
    Timestamp, WatchStatus, WatchedDir, WatchedFile, NEW_FILE_DEBOUNCE_MS, RESEND_BACKOFF_MS,
};
pub use domain::errors::SchedulerError;
pub use domain::registry::WatchRegistry;
pub use ports::inbound::SchedulerApi;
pub use ports::outbound::{FileSender, SystemTimeSource, TimeSource};
pub use service::{DirectoryPollingService, FlushOutcome};

#[cfg(any(test, feature = "test-utils"))]
pub use ports::outbound::MockTimeSource;

#[cfg(test)]
pub(crate) mod test_utils;
