//! Crypto error types.

use std::path::PathBuf;

use shared_types::MimeError;
use thiserror::Error;

/// Security envelope and key lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// Digest or cipher name not recognised
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// No certificate registered for the AS2 id
    #[error("No certificate found for {0}")]
    CertificateNotFound(String),

    /// No private key registered for the AS2 id
    #[error("No private key found for {0}")]
    PrivateKeyNotFound(String),

    /// Certificate or key file could not be read
    #[error("Failed to load key material from {path}: {reason}")]
    KeyLoad {
        /// File that failed to load
        path: PathBuf,
        /// Underlying reason
        reason: String,
    },

    /// Signing failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Signature verification failed
    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),

    /// The configured provider cannot perform the operation
    #[error("S/MIME operation not available: {0}")]
    Unsupported(String),

    /// The envelope is not well-formed MIME
    #[error("Malformed envelope: {0}")]
    Mime(#[from] MimeError),
}
