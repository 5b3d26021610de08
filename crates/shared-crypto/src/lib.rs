//! # Shared Crypto - AS2 Security Envelope Support
//!
//! ## Components
//!
//! | Module | Contents | Use Case |
//! |--------|----------|----------|
//! | `mic` | MD5, SHA-1, SHA-2 digests, base64 | Message Integrity Code |
//! | `keys` | `Certificate`, `PrivateKey`, `CertificateStore` | Identity lookup by AS2 id |
//! | `smime` | `SmimeProvider` port | Sign / encrypt / decrypt / verify |
//! | `testing` | `FakeSmime` (feature `test-utils`) | Deterministic envelope for tests |
//!
//! ## Envelope Ordering Contract
//!
//! ```text
//! outbound:  content ──sign──→ multipart/signed ──encrypt──→ application/pkcs7-mime
//! inbound:   application/pkcs7-mime ──decrypt──→ multipart/signed ──verify──→ content
//! ```
//!
//! The CMS primitives themselves live behind `SmimeProvider`; this crate
//! decides nothing about RSA or AES.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod errors;
pub mod keys;
pub mod mic;
pub mod smime;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-exports
pub use errors::CryptoError;
pub use keys::{Certificate, CertificateStore, InMemoryKeyStore, PrivateKey};
pub use mic::{calculate_mic, validate_returned_mic, MicAlgorithm};
pub use smime::{is_encrypted, is_signed, DisabledSmime, SmimeProvider};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
