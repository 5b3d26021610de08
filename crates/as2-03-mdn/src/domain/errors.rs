//! MDN error types.

use as2_02_storage::StorageError;
use shared_crypto::CryptoError;
use shared_types::{As2Error, MimeError, TransportError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MdnError {
    /// The body is not a `multipart/report`.
    #[error("Mime body part was not recognized as an MDN ({0})")]
    NotAReport(String),

    #[error("MDN report has no message/disposition-notification part")]
    MissingNotification,

    #[error(transparent)]
    Options(#[from] As2Error),

    #[error(transparent)]
    Mime(#[from] MimeError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The partner answered an async MDN POST with a non-2xx status.
    #[error("Async MDN to {url} rejected with status {status}")]
    Rejected { url: String, status: u16 },
}

impl MdnError {
    /// The report could not be read, as opposed to a security, storage or
    /// transport failure.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            MdnError::NotAReport(_)
                | MdnError::MissingNotification
                | MdnError::Options(_)
                | MdnError::Mime(_)
        )
    }
}
