//! # Certificates and Private Keys
//!
//! The engine only ever asks "certificate / key for AS2 id X". How key
//! material is stored is up to the `CertificateStore` implementation; the
//! bundled `InMemoryKeyStore` is filled from files at startup.
//!
//! Aliases are case-insensitive, like AS2 ids.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::CryptoError;

/// An X.509 certificate as raw DER or PEM bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Certificate {
    bytes: Vec<u8>,
}

impl Certificate {
    /// Wraps raw certificate bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw bytes as loaded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex SHA-256 of the raw bytes, for logs and recipient matching.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

impl fmt::Debug for Certificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Certificate")
            .field("fingerprint", &self.fingerprint())
            .finish()
    }
}

/// Private key bytes, wiped from memory on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    bytes: Vec<u8>,
}

impl PrivateKey {
    /// Wraps raw key bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Certificate collaborator: key material by AS2 id.
pub trait CertificateStore: Send + Sync {
    /// Certificate registered for `alias`.
    fn certificate(&self, alias: &str) -> Result<Certificate, CryptoError>;

    /// Private key registered for `alias`.
    fn private_key(&self, alias: &str) -> Result<PrivateKey, CryptoError>;

    /// Whether a private key is registered for `alias`.
    fn has_private_key(&self, alias: &str) -> bool;
}

struct KeyEntry {
    certificate: Certificate,
    private_key: Option<PrivateKey>,
}

/// Thread-safe in-memory key store.
#[derive(Default)]
pub struct InMemoryKeyStore {
    entries: RwLock<HashMap<String, KeyEntry>>,
}

impl InMemoryKeyStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers key material for `alias`, replacing any previous entry.
    pub fn insert(&self, alias: &str, certificate: Certificate, private_key: Option<PrivateKey>) {
        debug!(
            alias = alias,
            fingerprint = %certificate.fingerprint(),
            has_key = private_key.is_some(),
            "[keys] Registered certificate"
        );
        self.entries.write().insert(
            alias.to_ascii_lowercase(),
            KeyEntry {
                certificate,
                private_key,
            },
        );
    }

    /// Reads a certificate file and an optional key file and registers them.
    pub fn load_files(
        &self,
        alias: &str,
        certificate_path: &Path,
        key_path: Option<&Path>,
    ) -> Result<(), CryptoError> {
        let certificate = Certificate::from_bytes(read_key_file(certificate_path)?);
        let private_key = match key_path {
            Some(path) => Some(PrivateKey::from_bytes(read_key_file(path)?)),
            None => None,
        };
        self.insert(alias, certificate, private_key);
        Ok(())
    }

    /// Registered aliases (lower-cased).
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.entries.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

fn read_key_file(path: &Path) -> Result<Vec<u8>, CryptoError> {
    std::fs::read(path).map_err(|e| CryptoError::KeyLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

impl CertificateStore for InMemoryKeyStore {
    fn certificate(&self, alias: &str) -> Result<Certificate, CryptoError> {
        self.entries
            .read()
            .get(&alias.to_ascii_lowercase())
            .map(|e| e.certificate.clone())
            .ok_or_else(|| CryptoError::CertificateNotFound(alias.to_string()))
    }

    fn private_key(&self, alias: &str) -> Result<PrivateKey, CryptoError> {
        self.entries
            .read()
            .get(&alias.to_ascii_lowercase())
            .and_then(|e| e.private_key.clone())
            .ok_or_else(|| CryptoError::PrivateKeyNotFound(alias.to_string()))
    }

    fn has_private_key(&self, alias: &str) -> bool {
        self.entries
            .read()
            .get(&alias.to_ascii_lowercase())
            .map(|e| e.private_key.is_some())
            .unwrap_or(false)
    }
}
