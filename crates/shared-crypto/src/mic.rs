//! # Message Integrity Code
//!
//! `MIC = base64(digest(content)) + ", " + algorithm`
//!
//! ## What Is Digested (RFC 4130 §7.3.1)
//!
//! | Message | Digest covers |
//! |---------|---------------|
//! | signed and/or encrypted | MIME headers + content of the signed part |
//! | neither | content only |
//!
//! Sender and receiver apply the same rule, so the algorithm suffix written by
//! the receiver is exactly the name the sender asked for.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use shared_types::MimePart;
use tracing::info;

use crate::errors::CryptoError;

/// Digest algorithms accepted for MICs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MicAlgorithm {
    /// MD5 (legacy partners only)
    Md5,
    /// SHA-1, the AS2 default
    Sha1,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl MicAlgorithm {
    /// Parses `md5`, `sha1`/`sha-1`, `sha256`/`sha-256`, ... case-insensitively.
    pub fn from_name(name: &str) -> Result<Self, CryptoError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "md5" => Ok(MicAlgorithm::Md5),
            "sha1" | "sha-1" => Ok(MicAlgorithm::Sha1),
            "sha256" | "sha-256" => Ok(MicAlgorithm::Sha256),
            "sha384" | "sha-384" => Ok(MicAlgorithm::Sha384),
            "sha512" | "sha-512" => Ok(MicAlgorithm::Sha512),
            other => Err(CryptoError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    /// Raw digest of `data`.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            MicAlgorithm::Md5 => Md5::digest(data).to_vec(),
            MicAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
            MicAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
            MicAlgorithm::Sha384 => Sha384::digest(data).to_vec(),
            MicAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        }
    }
}

/// Computes the MIC string for `part` using the algorithm as named by the
/// requester (the name is echoed verbatim after the comma).
pub fn calculate_mic(
    part: &MimePart,
    algorithm: &str,
    include_headers: bool,
) -> Result<String, CryptoError> {
    let algorithm = algorithm.trim();
    let digest = MicAlgorithm::from_name(algorithm)?;
    let hash = if include_headers {
        digest.digest(&part.to_bytes())
    } else {
        digest.digest(part.body())
    };
    Ok(format!("{}, {}", STANDARD.encode(hash), algorithm))
}

/// Compares the MIC we recorded with the one a partner returned.
///
/// All whitespace is removed from both sides; the rest must match exactly,
/// algorithm suffix and case included.
pub fn validate_returned_mic(original_mic: &str, returned_mic: &str) -> bool {
    let original: String = original_mic.chars().filter(|c| !c.is_whitespace()).collect();
    let returned: String = returned_mic.chars().filter(|c| !c.is_whitespace()).collect();
    if original != returned {
        info!(
            original_mic = %original,
            returned_mic = %returned,
            "[mic] MIC not matched"
        );
        return false;
    }
    true
}
