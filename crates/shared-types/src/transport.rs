//! Outbound HTTP port.
//!
//! Both the file sender and the async MDN sender POST through this trait. The
//! node runtime provides the reqwest adapter; tests provide in-memory ones.
//! No timeout is imposed here beyond what the adapter's client applies.

use async_trait::async_trait;
use thiserror::Error;

use crate::headers::Headers;

/// A POST to a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub url: String,
    pub headers: Headers,
    pub body: Vec<u8>,
}

/// The partner's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header value).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection refused, reset, TLS failure and the like.
    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError>;
}
