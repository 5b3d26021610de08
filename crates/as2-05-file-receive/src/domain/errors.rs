//! Receive error types.

use as2_03_mdn::MdnError;
use shared_types::{As2Error, DispositionError, DispositionType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiveError {
    /// The request itself is unusable. Answered with 400.
    #[error("{0}")]
    Protocol(String),

    /// A processing outcome reported to the sender as a disposition.
    #[error(transparent)]
    Disposition(#[from] DispositionError),

    /// Malformed `Disposition-Notification-Options`.
    #[error(transparent)]
    Options(#[from] As2Error),

    /// A report posted to the file port could not be read.
    #[error(transparent)]
    Mdn(#[from] MdnError),
}

impl ReceiveError {
    pub fn http_status(&self) -> u16 {
        match self {
            ReceiveError::Protocol(_) => 400,
            ReceiveError::Mdn(err) if err.is_malformed() => 400,
            _ => 500,
        }
    }

    pub fn disposition(&self) -> Option<&DispositionType> {
        match self {
            ReceiveError::Disposition(err) => Some(&err.disposition),
            _ => None,
        }
    }
}
