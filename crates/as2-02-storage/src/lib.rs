//! # Message Storage (as2-02)
//!
//! Persists everything the node keeps on disk: received files, MDN records,
//! and the pending-correlation records that bridge an async send to its
//! later MDN.
//!
//! ## Directory Layout
//!
//! ```text
//! {home}/
//! ├── certs/
//! ├── inbox/<sender>/<file>             received files
//! ├── outbox/<partner>/<file>           watched by the scheduler
//! └── system/
//!     ├── mdn/<msgid>.mdn.json          sent and received MDNs
//!     ├── pending/mdn/<file>            data files awaiting an async MDN
//!     ├── pending/mdn-info/<msgid>.json correlation records
//!     ├── sent/<file>                   fully acknowledged files
//!     └── temp/
//! ```
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | 1 | The record key is the message id | `pending_info_path()`; no id inside the record |
//! | 2 | Record + moved file are written as a pair | single storage mutex, rollback of the move |
//! | 3 | Keys never escape their directory | `sanitize_file_name()` on every key |
//! | 4 | Existing files are never overwritten | `unique_file_name()` |
//! | 5 | One process owns the directory tree | `DirectoryLock` (fs2) |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - Directory layout and errors
//! - `ports/inbound.rs` - `MessageStore` trait used by the pipelines
//! - `adapters/` - `FileSystemStorage`, `DirectoryLock`

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::filesystem::FileSystemStorage;
pub use adapters::lock::DirectoryLock;
pub use domain::errors::StorageError;
pub use domain::layout::{StorageLayout, SystemDir};
pub use ports::inbound::MessageStore;
