//! # File Receive Subsystem (as2-05)
//!
//! Handles one inbound POST on the file port.
//!
//! ## Pipeline
//!
//! ```text
//! validate-request ─→ extract-mime-data ─→ handle-async-mdn ─→ handle-file ─→ send-mdn
//!                       decrypt, verify       report? answer      store payload    reply per mode
//!                                             and terminate
//! ```
//!
//! Some partners post their async MDNs to the file port instead of the URL
//! we advertise. Whether a request carries a file or a receipt is only known
//! once the envelope is open, so `handle-async-mdn` sits after extraction
//! and ends the run early for receipts.
//!
//! ## Failures
//!
//! | Stage error | HTTP | Body |
//! |-------------|------|------|
//! | bad method, missing `AS2-From`/`AS2-To`/`Content-Type`, no entity | 400 | reason |
//! | decryption | 500 | `...; processed/error:decryption-failed` |
//! | signature verification | 500 | `...; processed/error:integrity-check-failed` |
//! | saving the file, computing the MIC | 500 | `...; processed/error:unexpected-processing-error` |
//! | anything else | 500 | error text |

pub mod domain;
pub mod service;
pub mod stages;

pub use domain::context::ReceiveContext;
pub use domain::errors::ReceiveError;
pub use service::{FileReceiverService, ReceiverDependencies};

#[cfg(test)]
pub(crate) mod test_utils;
