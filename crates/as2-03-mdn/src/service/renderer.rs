//! Turns a `ReplyMdn` into what goes on the wire, and opens signed
//! receipts coming the other way.

use std::sync::Arc;

use shared_crypto::{is_signed, CertificateStore, CryptoError, SmimeProvider};
use shared_types::constants::header;
use shared_types::{HttpReply, MimePart};
use tracing::{debug, warn};

use crate::domain::reply::ReplyMdn;
use crate::domain::report::build_report;

/// Digest used to sign a receipt when the requester named none.
const DEFAULT_SIGN_DIGEST: &str = "sha1";

#[derive(Clone)]
pub struct ReplyRenderer {
    smime: Arc<dyn SmimeProvider>,
    certs: Arc<dyn CertificateStore>,
}

impl ReplyRenderer {
    pub fn new(smime: Arc<dyn SmimeProvider>, certs: Arc<dyn CertificateStore>) -> Self {
        Self { smime, certs }
    }

    /// The report part, signed by the receiving company when requested.
    ///
    /// A receipt that cannot be signed is sent unsigned.
    pub fn render(&self, mdn: &ReplyMdn) -> MimePart {
        let report = build_report(mdn);
        if !mdn.signed_reply {
            return report;
        }
        match self.sign(&report, mdn) {
            Ok(signed) => signed,
            Err(err) => {
                warn!(
                    "[as2-03] Error signing MDN for {}, sending unsigned: {}",
                    mdn.original_message_id(),
                    err
                );
                report
            }
        }
    }

    /// Headers and body of the receipt as an HTTP message.
    pub fn http_reply(&self, mdn: &ReplyMdn) -> HttpReply {
        let part = self.render(mdn);
        let mut headers = mdn.headers.clone();
        headers.set(header::CONTENT_TYPE, part.content_type_value());
        HttpReply {
            status: 200,
            headers,
            body: part.into_body(),
        }
    }

    fn sign(&self, report: &MimePart, mdn: &ReplyMdn) -> Result<MimePart, CryptoError> {
        let certificate = self.certs.certificate(&mdn.company_id)?;
        let key = self.certs.private_key(&mdn.company_id)?;
        let digest = if mdn.mic_algorithm.trim().is_empty() {
            DEFAULT_SIGN_DIGEST
        } else {
            mdn.mic_algorithm.trim()
        };
        self.smime.sign(report, &certificate, &key, digest)
    }
}

/// Verifies and strips the signature of `part` if it is signed by
/// `signer_id`; unsigned parts are returned as they are.
pub fn open_signed(
    part: MimePart,
    signer_id: &str,
    smime: &dyn SmimeProvider,
    certs: &dyn CertificateStore,
) -> Result<MimePart, CryptoError> {
    if !is_signed(&part) {
        return Ok(part);
    }
    let certificate = certs.certificate(signer_id)?;
    let content = smime.verify(&part, &certificate)?;
    debug!("[as2-03] Signature of {} verified", signer_id);
    Ok(content)
}
