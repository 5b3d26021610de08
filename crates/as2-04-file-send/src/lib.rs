//! # File Send Subsystem (as2-04)
//!
//! Sends one outbox file to a trading partner and handles what comes back.
//!
//! ## Pipeline
//!
//! ```text
//! create-mime-body ─→ envelope-mime-body ─→ validate-message ─→ transmit-file ─→ receive-mdn
//!   file on disk        sign, then encrypt     required fields     HTTP POST         by MDN mode
//!                       outgoing MIC
//! ```
//!
//! | MDN mode | After a 2xx answer | Final status |
//! |----------|--------------------|--------------|
//! | `NONE` | file archived to `sent/` | `Sent` |
//! | `STANDARD` | receipt verified, parsed, stored; disposition and MIC checked; file archived | `Sent` |
//! | `ASYNC` | file moved aside, pending record written | `Pending` |
//!
//! Any stage error stops the run. The failure handlers log it and record it
//! on the message (`status = Failed`, `error_cause`), which is how the
//! scheduler learns about it. The done handlers always drop the partner's
//! response and log the outcome.
//!
//! ## Outgoing MIC
//!
//! Computed over the content before any envelope is applied, with the
//! algorithm named in the partner's `mdn_options`. MIME headers are included
//! when the content is signed or encrypted, the same rule the receiving side
//! applies.

pub mod domain;
pub mod service;
pub mod stages;

pub use domain::context::SendContext;
pub use domain::errors::SendError;
pub use domain::headers::{build_request_headers, SendConfig};
pub use service::{FileSenderService, SenderDependencies};

#[cfg(test)]
pub(crate) mod test_utils;
