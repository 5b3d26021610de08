//! S/MIME provider port.
//!
//! The pipelines decide when to call these operations and in which order
//! (sign before encrypt, decrypt before verify). A provider only has to
//! honour the content-type contract:
//!
//! | Operation | Input | Output |
//! |-----------|-------|--------|
//! | `sign` | any part | `multipart/signed` (content + detached signature) |
//! | `encrypt` | any part | `application/pkcs7-mime; smime-type=enveloped-data` |
//! | `decrypt` | enveloped part | the inner part |
//! | `verify` | `multipart/signed` | the signed content, signature stripped |

use shared_types::MimePart;

use crate::errors::CryptoError;
use crate::keys::{Certificate, PrivateKey};

/// Signing and enveloping of MIME parts.
pub trait SmimeProvider: Send + Sync {
    /// Wraps `part` into `multipart/signed`; `digest` names the micalg.
    fn sign(
        &self,
        part: &MimePart,
        certificate: &Certificate,
        key: &PrivateKey,
        digest: &str,
    ) -> Result<MimePart, CryptoError>;

    /// Envelopes `part` for `recipient` with the named cipher.
    fn encrypt(
        &self,
        part: &MimePart,
        recipient: &Certificate,
        algorithm: &str,
    ) -> Result<MimePart, CryptoError>;

    /// Opens an enveloped part addressed to `certificate`.
    fn decrypt(
        &self,
        part: &MimePart,
        certificate: &Certificate,
        key: &PrivateKey,
    ) -> Result<MimePart, CryptoError>;

    /// Checks the detached signature against `signer` and returns the content.
    fn verify(&self, part: &MimePart, signer: &Certificate) -> Result<MimePart, CryptoError>;
}

/// `application/pkcs7-mime` with `smime-type=enveloped-data`.
pub fn is_encrypted(part: &MimePart) -> bool {
    part.content_type()
        .map(|ct| {
            ct.is("application/pkcs7-mime")
                && ct
                    .param("smime-type")
                    .map(|t| t.eq_ignore_ascii_case("enveloped-data"))
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

/// `multipart/signed`.
pub fn is_signed(part: &MimePart) -> bool {
    part.is_mime_type("multipart/signed")
}

/// Provider used when no CMS backend is configured: plain exchanges work,
/// any request to sign, encrypt, decrypt or verify fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSmime;

impl SmimeProvider for DisabledSmime {
    fn sign(
        &self,
        _part: &MimePart,
        _certificate: &Certificate,
        _key: &PrivateKey,
        digest: &str,
    ) -> Result<MimePart, CryptoError> {
        Err(CryptoError::Unsupported(format!("sign with {}", digest)))
    }

    fn encrypt(
        &self,
        _part: &MimePart,
        _recipient: &Certificate,
        algorithm: &str,
    ) -> Result<MimePart, CryptoError> {
        Err(CryptoError::Unsupported(format!("encrypt with {}", algorithm)))
    }

    fn decrypt(
        &self,
        _part: &MimePart,
        _certificate: &Certificate,
        _key: &PrivateKey,
    ) -> Result<MimePart, CryptoError> {
        Err(CryptoError::Unsupported("decrypt".to_string()))
    }

    fn verify(&self, _part: &MimePart, _signer: &Certificate) -> Result<MimePart, CryptoError> {
        Err(CryptoError::Unsupported("verify".to_string()))
    }
}
