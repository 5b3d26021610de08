//! # MDN Subsystem (as2-03)
//!
//! Everything about Message Disposition Notifications: building the receipt
//! we return for a received file, reading the receipts partners return for
//! our files, and correlating asynchronous receipts with the send they
//! acknowledge.
//!
//! ## Receipt Format
//!
//! ```text
//! multipart/report; report-type=disposition-notification
//! ├── text/plain                          human readable text
//! └── message/disposition-notification    Reporting-UA, Original-Recipient,
//!                                         Final-Recipient, Original-Message-ID,
//!                                         Disposition, Received-Content-MIC
//! ```
//!
//! optionally wrapped in `multipart/signed` when the requester asked for a
//! signed receipt.
//!
//! ## Async Correlation
//!
//! | Check (in order) | Failing result |
//! |------------------|----------------|
//! | report has a notification part | `NO_CONTENT` |
//! | disposition is format-valid | `INVALID_DISPOSITION` |
//! | disposition is a success | `PROCESSING_FAILED` |
//! | pending record for the original message id loads | `ASYNC_LOAD_ERROR` |
//! | recorded MIC equals returned MIC | `MIC_NOT_MATCHED` |
//!
//! Only `OK` removes the pending record; a failed removal is logged.

pub mod domain;
pub mod service;

pub use domain::errors::MdnError;
pub use domain::reply::{create_reply_mdn, ReplyMdn};
pub use domain::report::{build_report, is_report, parse_report};
pub use domain::validation::{validate_mdn_disposition, validate_mdn_mic};
pub use service::processor::AsyncMdnProcessor;
pub use service::receiver::AsyncMdnReceiver;
pub use service::renderer::{open_signed, ReplyRenderer};
pub use service::sender::AsyncMdnSender;

#[cfg(test)]
pub(crate) mod test_utils;
