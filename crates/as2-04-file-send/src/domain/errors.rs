//! Send error types.

use as2_02_storage::StorageError;
use as2_03_mdn::MdnError;
use shared_crypto::CryptoError;
use shared_types::{As2Error, DispositionError, TransportError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("No partner configured for AS2 id {0}")]
    UnknownPartner(String),

    #[error("Cannot read {path}: {reason}")]
    Io { path: String, reason: String },

    /// Malformed `mdn_options` in the partner agreement.
    #[error(transparent)]
    Options(#[from] As2Error),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A required field was empty after the envelope stage.
    #[error("Invalid message: {0}")]
    Validation(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The partner answered the POST with a non-2xx status.
    #[error("Partner at {url} answered with HTTP {status}")]
    Rejected { url: String, status: u16 },

    #[error("Partner returned an empty MDN")]
    EmptyMdn,

    #[error(transparent)]
    Mdn(#[from] MdnError),

    /// The receipt reports a failure or carries the wrong MIC.
    #[error("{0} ({})", .0.text)]
    Disposition(#[from] DispositionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
