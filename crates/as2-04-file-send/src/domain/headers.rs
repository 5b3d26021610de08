//! The HTTP header set of an outgoing AS2 message.
//!
//! | Header | Value |
//! |--------|-------|
//! | `Connection` | `close, TE` |
//! | `User-Agent` | server agent |
//! | `Date` | now, RFC 822 |
//! | `Mime-Version` | `1.0` |
//! | `Message-ID` | generated id |
//! | `Recipient-Address` | partner URL |
//! | `Content-Type` | type of the (enveloped) entity |
//! | `AS2-Version` | `1.1` |
//! | `AS2-To` / `AS2-From` | receiver / sender id |
//! | `Subject` | `From <sender> to <receiver>` |
//! | `From` | company e-mail |
//! | `Disposition-Notification-To` | partner e-mail, `STANDARD` and `ASYNC` only |
//! | `Disposition-Notification-Options` | partner `mdn_options`, `STANDARD` and `ASYNC` only |
//! | `Receipt-Delivery-Option` | our async MDN URL, `ASYNC` only |
//! | `Content-Disposition` | `attachment; filename="<name>"` |

use chrono::Local;
use shared_types::constants::{
    header, server_agent, AS2_PROTOCOL_VERSION, MIME_VERSION, RFC822_DATE_FORMAT,
};
use shared_types::{Headers, MdnMode, OutgoingFileMessage, PartnerRecord};

/// Node-wide settings the sender needs beyond the partner agreement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendConfig {
    /// Sent as `From`.
    pub company_email: String,
    /// Advertised in `Receipt-Delivery-Option` for async receipts.
    pub async_mdn_url: String,
}

pub fn build_request_headers(
    message: &OutgoingFileMessage,
    partner: &PartnerRecord,
    config: &SendConfig,
) -> Headers {
    let settings = &partner.send_settings;
    let mut headers = Headers::new();
    headers.set(header::CONNECTION, "close, TE");
    headers.set(header::USER_AGENT, server_agent());
    headers.set(header::DATE, Local::now().format(RFC822_DATE_FORMAT).to_string());
    headers.set(header::MIME_VERSION, MIME_VERSION);
    headers.set(header::MESSAGE_ID, message.message_id.as_str());
    headers.set(header::RECIPIENT_ADDRESS, settings.url.as_str());
    headers.set(header::CONTENT_TYPE, message.content_type.as_str());
    headers.set(header::AS2_VERSION, AS2_PROTOCOL_VERSION);
    headers.set(header::AS2_TO, message.receiver_id.as_str());
    headers.set(header::AS2_FROM, message.sender_id.as_str());
    headers.set(
        header::SUBJECT,
        format!("From {} to {}", message.sender_id, message.receiver_id),
    );
    headers.set(header::FROM, config.company_email.as_str());

    match settings.mdn_mode {
        MdnMode::Standard => {
            headers.set(header::DISPOSITION_NOTIFICATION_TO, partner.email.as_str());
            headers.set(
                header::DISPOSITION_NOTIFICATION_OPTIONS,
                message.disposition_options.as_str(),
            );
        }
        MdnMode::Async => {
            headers.set(header::DISPOSITION_NOTIFICATION_TO, partner.email.as_str());
            headers.set(
                header::DISPOSITION_NOTIFICATION_OPTIONS,
                message.disposition_options.as_str(),
            );
            headers.set(header::RECEIPT_DELIVERY_OPTION, config.async_mdn_url.as_str());
        }
        MdnMode::None => {}
    }

    headers.set(
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", message.file_name),
    );
    headers
}
