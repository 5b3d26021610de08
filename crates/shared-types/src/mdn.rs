//! MDN vocabulary: how a receipt is requested, what it contains, and how an
//! incoming asynchronous receipt was judged.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::header;
use crate::headers::Headers;

/// How the sender asked for its receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MdnMode {
    /// No receipt requested.
    None,
    /// Receipt returned on the same HTTP connection.
    #[default]
    Standard,
    /// Receipt POSTed later to the `Receipt-Delivery-Option` URL.
    Async,
}

impl MdnMode {
    /// Derives the requested mode from inbound request headers.
    ///
    /// | Headers | Mode |
    /// |---------|------|
    /// | no `Disposition-Notification-Options` and no `Disposition-Notification-To` | `None` |
    /// | non-blank `Receipt-Delivery-Option` | `Async` |
    /// | otherwise | `Standard` |
    pub fn from_headers(headers: &Headers) -> Self {
        let options = headers.get_non_blank(header::DISPOSITION_NOTIFICATION_OPTIONS);
        let notify_to = headers.get_non_blank(header::DISPOSITION_NOTIFICATION_TO);
        if options.is_none() && notify_to.is_none() {
            MdnMode::None
        } else if headers
            .get_non_blank(header::RECEIPT_DELIVERY_OPTION)
            .is_some()
        {
            MdnMode::Async
        } else {
            MdnMode::Standard
        }
    }
}

impl fmt::Display for MdnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MdnMode::None => "NONE",
            MdnMode::Standard => "STANDARD",
            MdnMode::Async => "ASYNC",
        };
        f.write_str(s)
    }
}

/// The machine-readable fields of a `message/disposition-notification` part.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MdnAttributes {
    pub reporting_ua: String,
    pub original_recipient: String,
    pub final_recipient: String,
    pub original_message_id: String,
    /// The `Disposition` line: processing outcome reported by the receiver.
    pub content_disposition: String,
    /// MIC the receiver calculated over the content it received.
    pub received_content_mic: String,
}

/// Outcome of processing an incoming asynchronous MDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MdnReceiveStatus {
    Ok,
    MicNotMatched,
    NoContent,
    InvalidDisposition,
    ProcessingFailed,
    AsyncLoadError,
}

impl MdnReceiveStatus {
    /// HTTP status and body returned on the connection that delivered the MDN.
    ///
    /// | Status | HTTP | Body |
    /// |--------|------|------|
    /// | `Ok` | 200 | MDN Received Successfully |
    /// | `MicNotMatched` | 404 | The MIC does not match |
    /// | `NoContent` | 400 | No MDN entity found in request body |
    /// | `InvalidDisposition` | 400 | The POST did not contain a valid content-disposition for the MDN |
    /// | `ProcessingFailed` | 200 | MDN processing failed |
    /// | `AsyncLoadError` | 404 | No pending MDN found for the original message |
    pub fn http_response(&self) -> (u16, &'static str) {
        match self {
            MdnReceiveStatus::Ok => (200, "MDN Received Successfully"),
            MdnReceiveStatus::MicNotMatched => (404, "The MIC does not match"),
            MdnReceiveStatus::NoContent => (400, "No MDN entity found in request body"),
            MdnReceiveStatus::InvalidDisposition => (
                400,
                "The POST did not contain a valid content-disposition for the MDN",
            ),
            MdnReceiveStatus::ProcessingFailed => (200, "MDN processing failed"),
            MdnReceiveStatus::AsyncLoadError => {
                (404, "No pending MDN found for the original message")
            }
        }
    }
}

impl fmt::Display for MdnReceiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MdnReceiveStatus::Ok => "OK",
            MdnReceiveStatus::MicNotMatched => "MIC_NOT_MATCHED",
            MdnReceiveStatus::NoContent => "NO_CONTENT",
            MdnReceiveStatus::InvalidDisposition => "INVALID_DISPOSITION",
            MdnReceiveStatus::ProcessingFailed => "PROCESSING_FAILED",
            MdnReceiveStatus::AsyncLoadError => "ASYNC_LOAD_ERROR",
        };
        f.write_str(s)
    }
}

/// Direction of a persisted MDN record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MdnDirection {
    /// A receipt a partner sent us.
    Received,
    /// A receipt we sent to a partner.
    Sent,
}

/// An MDN as written to the `mdn/` directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdnDocument {
    pub direction: MdnDirection,
    pub partner_id: String,
    pub company_id: String,
    pub body_text: String,
    pub attributes: MdnAttributes,
}

/// A parsed MDN received from a partner, synchronously or asynchronously.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IncomingMdn {
    pub body_text: String,
    pub attributes: MdnAttributes,
}
