//! Deterministic S/MIME stand-in for tests.
//!
//! Produces the real outer content types so the pipelines' routing is
//! exercised, but the "signature" is a SHA-256 over the signer certificate
//! and the signed bytes, and the "envelope" is the inner part XOR-masked and
//! tagged with the recipient fingerprint. Never use outside tests.

use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use shared_types::mime::split_parts;
use shared_types::{ContentType, MimePart, Multipart};

use crate::errors::CryptoError;
use crate::keys::{Certificate, PrivateKey};
use crate::smime::SmimeProvider;

const ENVELOPE_TAG: &[u8] = b"FAKE-ENVELOPE:";
const MASK: u8 = 0x5a;

/// Builds a matching certificate / key pair for `alias`.
pub fn fake_identity(alias: &str) -> (Certificate, PrivateKey) {
    (
        Certificate::from_bytes(format!("CERT:{}", alias).into_bytes()),
        PrivateKey::from_bytes(format!("KEY:{}", alias).into_bytes()),
    )
}

/// Fake provider that records the order of operations.
#[derive(Default)]
pub struct FakeSmime {
    calls: Mutex<Vec<&'static str>>,
}

impl FakeSmime {
    /// Creates a provider with an empty call log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations performed so far, in order.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    fn record(&self, op: &'static str) {
        self.calls.lock().push(op);
    }

    fn signature(signer: &Certificate, content: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(signer.as_bytes());
        hasher.update(content);
        hex::encode(hasher.finalize())
    }
}

impl SmimeProvider for FakeSmime {
    fn sign(
        &self,
        part: &MimePart,
        certificate: &Certificate,
        key: &PrivateKey,
        digest: &str,
    ) -> Result<MimePart, CryptoError> {
        self.record("sign");
        if key.as_bytes().is_empty() {
            return Err(CryptoError::SigningFailed("empty key".to_string()));
        }
        let content_type = ContentType::new("multipart/signed")
            .with_param("protocol", "application/pkcs7-signature")
            .with_param("micalg", digest.to_ascii_lowercase());
        let mut signed = Multipart::with_content_type(content_type);
        let signature = Self::signature(certificate, &part.to_bytes());
        signed.push(part.clone());
        signed.push(MimePart::from_entity(
            "application/pkcs7-signature; name=smime.p7s",
            signature.into_bytes(),
        ));
        Ok(signed.into_part())
    }

    fn encrypt(
        &self,
        part: &MimePart,
        recipient: &Certificate,
        _algorithm: &str,
    ) -> Result<MimePart, CryptoError> {
        self.record("encrypt");
        let mut body = ENVELOPE_TAG.to_vec();
        body.extend_from_slice(recipient.fingerprint().as_bytes());
        body.push(b'\n');
        body.extend(part.to_bytes().iter().map(|b| b ^ MASK));
        Ok(MimePart::from_entity(
            "application/pkcs7-mime; smime-type=enveloped-data; name=smime.p7m",
            body,
        ))
    }

    fn decrypt(
        &self,
        part: &MimePart,
        certificate: &Certificate,
        _key: &PrivateKey,
    ) -> Result<MimePart, CryptoError> {
        self.record("decrypt");
        let body = part.body();
        let rest = body
            .strip_prefix(ENVELOPE_TAG)
            .ok_or_else(|| CryptoError::DecryptionFailed("not an envelope".to_string()))?;
        let newline = rest
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| CryptoError::DecryptionFailed("truncated envelope".to_string()))?;
        if rest[..newline] != *certificate.fingerprint().as_bytes() {
            return Err(CryptoError::DecryptionFailed(
                "envelope addressed to another recipient".to_string(),
            ));
        }
        let inner: Vec<u8> = rest[newline + 1..].iter().map(|b| b ^ MASK).collect();
        Ok(MimePart::parse(&inner)?)
    }

    fn verify(&self, part: &MimePart, signer: &Certificate) -> Result<MimePart, CryptoError> {
        self.record("verify");
        let boundary = part
            .content_type()
            .and_then(|ct| ct.param("boundary").map(str::to_string))
            .ok_or_else(|| {
                CryptoError::SignatureVerificationFailed("no boundary".to_string())
            })?;
        let raw = split_parts(part.body(), &boundary)?;
        if raw.len() != 2 {
            return Err(CryptoError::SignatureVerificationFailed(format!(
                "expected 2 parts, found {}",
                raw.len()
            )));
        }
        let signature_part = MimePart::parse(raw[1])?;
        let expected = Self::signature(signer, raw[0]);
        if signature_part.body() != expected.as_bytes() {
            return Err(CryptoError::SignatureVerificationFailed(
                "signature mismatch".to_string(),
            ));
        }
        Ok(MimePart::parse(raw[0])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smime::{is_encrypted, is_signed};

    fn payload() -> MimePart {
        let mut part = MimePart::from_entity("application/EDIFACT", b"UNB+UNOA:1".to_vec());
        part.headers_mut()
            .set("Content-Disposition", "Attachment; filename=\"a.edi\"");
        part
    }

    #[test]
    fn test_sign_encrypt_then_decrypt_verify() {
        let smime = FakeSmime::new();
        let (sender_cert, sender_key) = fake_identity("sender");
        let (receiver_cert, receiver_key) = fake_identity("receiver");

        let signed = smime.sign(&payload(), &sender_cert, &sender_key, "SHA1").unwrap();
        assert!(is_signed(&signed));
        let enveloped = smime.encrypt(&signed, &receiver_cert, "3des").unwrap();
        assert!(is_encrypted(&enveloped));

        let opened = smime.decrypt(&enveloped, &receiver_cert, &receiver_key).unwrap();
        assert!(is_signed(&opened));
        let content = smime.verify(&opened, &sender_cert).unwrap();
        assert_eq!(content, payload());
        assert_eq!(smime.calls(), vec!["sign", "encrypt", "decrypt", "verify"]);
    }

    #[test]
    fn test_wrong_recipient_cannot_decrypt() {
        let smime = FakeSmime::new();
        let (receiver_cert, _) = fake_identity("receiver");
        let (other_cert, other_key) = fake_identity("other");
        let enveloped = smime.encrypt(&payload(), &receiver_cert, "3des").unwrap();
        assert!(matches!(
            smime.decrypt(&enveloped, &other_cert, &other_key),
            Err(CryptoError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn test_wrong_signer_fails_verification() {
        let smime = FakeSmime::new();
        let (sender_cert, sender_key) = fake_identity("sender");
        let (impostor_cert, _) = fake_identity("impostor");
        let signed = smime.sign(&payload(), &sender_cert, &sender_key, "sha1").unwrap();
        assert!(matches!(
            smime.verify(&signed, &impostor_cert),
            Err(CryptoError::SignatureVerificationFailed(_))
        ));
    }
}
