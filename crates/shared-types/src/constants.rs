//! Protocol constants and well-known header names.

/// Application name without spaces, used in agent strings and message ids.
pub const APP_NAME: &str = "AS2Node";

/// Crate version, reported in `Server` and `User-Agent` headers.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// AS2 protocol version sent in the `AS2-Version` header.
pub const AS2_PROTOCOL_VERSION: &str = "1.1";

pub const MIME_VERSION: &str = "1.0";

pub const CRLF: &str = "\r\n";

/// Prefix of generated message ids: `<AS2NODE-...>`.
pub const MESSAGE_ID_PREFIX: &str = "AS2NODE";

/// `Server` / `User-Agent` value, e.g. `AS2NodeServer/0.1.0`.
pub fn server_agent() -> String {
    format!("{}Server/{}", APP_NAME, APP_VERSION)
}

/// HTTP status codes treated as a successful transmission.
pub const SUCCESS_STATUS_CODES: [u16; 5] = [200, 201, 202, 204, 206];

pub fn is_success_status(status: u16) -> bool {
    SUCCESS_STATUS_CODES.contains(&status)
}

/// Header names used on the wire.
pub mod header {
    pub const AS2_FROM: &str = "AS2-From";
    pub const AS2_TO: &str = "AS2-To";
    pub const AS2_VERSION: &str = "AS2-Version";
    pub const CONNECTION: &str = "Connection";
    pub const CONTENT_DISPOSITION: &str = "Content-Disposition";
    pub const CONTENT_TRANSFER_ENCODING: &str = "Content-Transfer-Encoding";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const DATE: &str = "Date";
    pub const DISPOSITION_NOTIFICATION_OPTIONS: &str = "Disposition-Notification-Options";
    pub const DISPOSITION_NOTIFICATION_TO: &str = "Disposition-Notification-To";
    pub const FROM: &str = "From";
    pub const MESSAGE_ID: &str = "Message-ID";
    pub const MIME_VERSION: &str = "Mime-Version";
    pub const RECEIPT_DELIVERY_OPTION: &str = "Receipt-Delivery-Option";
    pub const RECIPIENT_ADDRESS: &str = "Recipient-Address";
    pub const SERVER: &str = "Server";
    pub const SUBJECT: &str = "Subject";
    pub const USER_AGENT: &str = "User-Agent";

    // Fields inside a message/disposition-notification part
    pub const REPORTING_UA: &str = "Reporting-UA";
    pub const ORIGINAL_RECIPIENT: &str = "Original-Recipient";
    pub const FINAL_RECIPIENT: &str = "Final-Recipient";
    pub const ORIGINAL_MESSAGE_ID: &str = "Original-Message-ID";
    pub const DISPOSITION: &str = "Disposition";
    pub const RECEIVED_CONTENT_MIC: &str = "Received-Content-MIC";
}

/// Date format used for the `Date` header (RFC 822).
pub const RFC822_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";
