//! # AS2 Node Test Suite
//!
//! Cross-crate flows between two complete nodes on loopback ports.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── test_utils.rs    # two-node harness: configs, certificates, ports
//! └── integration/     # end-to-end exchanges
//!     ├── exchange.rs  # file POST with a synchronous MDN
//!     ├── async_mdn.rs # receipt delivered on the MDN port
//!     └── scheduler.rs # outbox file picked up and sent
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p as2-tests
//! cargo test -p as2-tests integration::async_mdn
//! ```
//!
//! Both nodes use the fake S/MIME provider so signed and encrypted
//! exchanges run without a CMS backend. Everything else is the production
//! wiring: axum listeners, reqwest transport, filesystem storage.

pub mod integration;

#[cfg(test)]
pub(crate) mod test_utils;
