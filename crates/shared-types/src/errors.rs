//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;

use crate::disposition::DispositionType;

/// Errors from the MIME part model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MimeError {
    /// A header line without a `:` separator.
    #[error("Malformed MIME header line: {0}")]
    MalformedHeader(String),

    /// The part carries no `Content-Type` header.
    #[error("MIME part has no Content-Type")]
    MissingContentType,

    /// A multipart operation on a non-multipart part.
    #[error("Content type {0} is not multipart")]
    NotMultipart(String),

    /// `multipart/*` without a `boundary` parameter.
    #[error("Multipart content type has no boundary")]
    MissingBoundary,

    /// The body ends before the closing boundary.
    #[error("Multipart body is not terminated by its boundary")]
    Unterminated,
}

/// General protocol error: malformed headers, option strings and the like.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct As2Error(pub String);

impl As2Error {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A processing outcome that must be reported to the partner as a structured
/// disposition (e.g. `processed/error: decryption-failed`).
///
/// Displays as the disposition line itself, which is what ends up in an HTTP
/// error body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{disposition}")]
pub struct DispositionError {
    pub disposition: DispositionType,
    /// Human readable explanation (MDN body text when the error came from a partner).
    pub text: String,
}

impl DispositionError {
    pub fn new(disposition: DispositionType, text: impl Into<String>) -> Self {
        Self {
            disposition,
            text: text.into(),
        }
    }

    /// `processed/error: <description>`.
    pub fn error(description: &str, text: impl Into<String>) -> Self {
        Self::new(DispositionType::error(description), text)
    }
}
