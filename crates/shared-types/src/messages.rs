//! # Message Types
//!
//! One value per transfer, owned by the pipeline processing it:
//!
//! | Type | Created by | Lifetime |
//! |------|-----------|----------|
//! | `OutgoingFileMessage` | scheduler | one send pipeline run |
//! | `IncomingMessage` | HTTP adapter | one receive pipeline run |
//! | `IncomingFileMessage` | receive pipeline | from file detection to MDN reply |
//! | `HttpReply` | receive pipeline | written back to the connection |

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{header, MESSAGE_ID_PREFIX};
use crate::entities::{ConnectionInfo, PendingMdnInfo};
use crate::headers::Headers;
use crate::mdn::MdnMode;

/// `<AS2NODE-{sender}-{receiver}-{yyyy-MM-dd-HH-mm-ss}-{8 hex}>`
pub fn generate_message_id(sender_id: &str, receiver_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "<{}-{}-{}-{}-{}>",
        MESSAGE_ID_PREFIX,
        sender_id,
        receiver_id,
        Local::now().format("%Y-%m-%d-%H-%M-%S"),
        &suffix[..8]
    )
}

// =============================================================================
// OUTGOING
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    New,
    /// Transmitted, synchronous receipt validated (or none requested).
    Sent,
    /// Transmitted, waiting for an async MDN.
    Pending,
    Failed,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MessageStatus::New => "new",
            MessageStatus::Sent => "sent",
            MessageStatus::Pending => "pending",
            MessageStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One outbound file transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingFileMessage {
    pub file_path: PathBuf,
    pub file_name: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub message_id: String,
    /// Content type of the transmitted (possibly enveloped) entity.
    pub content_type: String,
    /// `Disposition-Notification-Options` sent with the request.
    pub disposition_options: String,
    pub outgoing_mic: String,
    pub status: MessageStatus,
    pub pending_info: Option<PendingMdnInfo>,
    /// Set by the failure stage of the send pipeline.
    pub error_cause: Option<String>,
}

impl OutgoingFileMessage {
    pub fn new(file_path: impl AsRef<Path>, sender_id: &str, receiver_id: &str) -> Self {
        let file_path = file_path.as_ref().to_path_buf();
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            file_path,
            file_name,
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            message_id: generate_message_id(sender_id, receiver_id),
            content_type: String::new(),
            disposition_options: String::new(),
            outgoing_mic: String::new(),
            status: MessageStatus::New,
            pending_info: None,
            error_cause: None,
        }
    }
}

// =============================================================================
// INCOMING
// =============================================================================

/// One inbound HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    pub connection: ConnectionInfo,
    pub headers: Headers,
    /// `AS2-From`
    pub sender_id: String,
    /// `AS2-To`
    pub receiver_id: String,
    /// `Message-ID`
    pub message_id: String,
    pub mdn_mode: MdnMode,
}

impl IncomingMessage {
    pub fn new(connection: ConnectionInfo, headers: Headers) -> Self {
        let sender_id = headers.get_or_empty(header::AS2_FROM).trim().to_string();
        let receiver_id = headers.get_or_empty(header::AS2_TO).trim().to_string();
        let message_id = headers.get_or_empty(header::MESSAGE_ID).trim().to_string();
        let mdn_mode = MdnMode::from_headers(&headers);
        Self {
            connection,
            headers,
            sender_id,
            receiver_id,
            message_id,
            mdn_mode,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}

/// An inbound message that turned out to carry a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFileMessage {
    pub message: IncomingMessage,
    /// Name requested by the sender, or the message id.
    pub file_name: String,
    /// Where the payload was stored.
    pub saved_path: Option<PathBuf>,
}

impl IncomingFileMessage {
    pub fn new(message: IncomingMessage) -> Self {
        let file_name = message.message_id.clone();
        Self {
            message,
            file_name,
            saved_path: None,
        }
    }
}

// =============================================================================
// HTTP REPLY
// =============================================================================

/// Response written back on an inbound connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn text(status: u16, text: impl Into<String>) -> Self {
        let mut headers = Headers::new();
        headers.set(header::CONTENT_TYPE, "text/plain");
        Self {
            status,
            headers,
            body: text.into().into_bytes(),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl Default for HttpReply {
    fn default() -> Self {
        Self {
            status: 200,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_id_format() {
        let id = generate_message_id("mycompany", "partnerA");
        assert!(id.starts_with("<AS2NODE-mycompany-partnerA-"));
        assert!(id.ends_with('>'));
        // prefix, sender, receiver, 6 date fields, suffix
        assert_eq!(id.trim_matches(['<', '>']).split('-').count(), 10);
    }

    #[test]
    fn test_message_ids_are_distinct_within_a_second() {
        let a = generate_message_id("a", "b");
        let b = generate_message_id("a", "b");
        assert_ne!(a, b);
    }

    #[test]
    fn test_outgoing_message_takes_file_name() {
        let msg = OutgoingFileMessage::new("/home/outbox/acme/order.edi", "me", "acme");
        assert_eq!(msg.file_name, "order.edi");
        assert_eq!(msg.status, MessageStatus::New);
        assert!(msg.pending_info.is_none());
    }

    #[test]
    fn test_incoming_message_reads_identity_headers() {
        let headers: Headers = [
            ("as2-from", "acme"),
            ("AS2-To", "me"),
            ("Message-ID", "<abc@acme>"),
        ]
        .into_iter()
        .collect();
        let msg = IncomingMessage::new(ConnectionInfo::default(), headers);
        assert_eq!(msg.sender_id, "acme");
        assert_eq!(msg.receiver_id, "me");
        assert_eq!(msg.message_id, "<abc@acme>");
        assert_eq!(msg.mdn_mode, MdnMode::None);

        let file = IncomingFileMessage::new(msg);
        assert_eq!(file.file_name, "<abc@acme>");
    }
}
