//! The receipt we send back for a received file.

use chrono::Local;
use shared_types::constants::{
    header, server_agent, AS2_PROTOCOL_VERSION, MIME_VERSION, RFC822_DATE_FORMAT,
};
use shared_types::{
    As2Error, DispositionOptions, DispositionType, Headers, IncomingFileMessage, MdnAttributes,
    MdnDirection, MdnDocument, MdnMode,
};

/// A reply MDN, complete except for the received-content MIC, which the
/// caller fills in once it knows the digest algorithm is usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMdn {
    pub mdn_mode: MdnMode,
    /// `Receipt-Delivery-Option` of the request; empty unless `Async`.
    pub async_reply_to_url: String,
    pub signed_reply: bool,
    /// MIC algorithm named by the requester, empty when none was requested.
    pub mic_algorithm: String,
    pub body_text: String,
    /// HTTP headers sent with the receipt.
    pub headers: Headers,
    pub attributes: MdnAttributes,
    /// The partner that sent the file.
    pub partner_id: String,
    /// The local company that received it.
    pub company_id: String,
}

impl ReplyMdn {
    pub fn original_message_id(&self) -> &str {
        &self.attributes.original_message_id
    }

    /// The record written to the `mdn/` directory.
    pub fn to_document(&self) -> MdnDocument {
        MdnDocument {
            direction: MdnDirection::Sent,
            partner_id: self.partner_id.clone(),
            company_id: self.company_id.clone(),
            body_text: self.body_text.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Builds the reply for `message` reporting `disposition`.
///
/// AS2-From and AS2-To are swapped relative to the request. When the request
/// carried `Disposition-Notification-Options`, the reply is signed if they
/// name a protocol and uses the MIC algorithm they name.
///
/// # Errors
///
/// `As2Error` when the options header is present but malformed.
pub fn create_reply_mdn(
    message: &IncomingFileMessage,
    disposition: &DispositionType,
    from_header: &str,
) -> Result<ReplyMdn, As2Error> {
    let request = &message.message;

    let async_reply_to_url = if request.mdn_mode == MdnMode::Async {
        request
            .headers
            .get_or_empty(header::RECEIPT_DELIVERY_OPTION)
            .trim()
            .to_string()
    } else {
        String::new()
    };

    let mut headers = Headers::new();
    headers.set(header::CONNECTION, "close, TE");
    headers.set(header::AS2_VERSION, AS2_PROTOCOL_VERSION);
    headers.set(header::DATE, Local::now().format(RFC822_DATE_FORMAT).to_string());
    headers.set(header::SERVER, server_agent());
    headers.set(header::MIME_VERSION, MIME_VERSION);
    headers.set(header::AS2_FROM, request.receiver_id.as_str());
    headers.set(header::AS2_TO, request.sender_id.as_str());
    headers.set(header::FROM, from_header);
    headers.set(header::SUBJECT, "MDN Response");

    let connection = &request.connection;
    let attributes = MdnAttributes {
        reporting_ua: format!(
            "{}@{}:{}",
            server_agent(),
            connection.destination_ip,
            connection.destination_port
        ),
        original_recipient: format!("rfc822; {}", request.receiver_id),
        final_recipient: format!("rfc822; {}", request.receiver_id),
        original_message_id: request
            .headers
            .get_or_empty(header::MESSAGE_ID)
            .to_string(),
        content_disposition: disposition.to_string(),
        received_content_mic: String::new(),
    };

    let (signed_reply, mic_algorithm) =
        match request.headers.get(header::DISPOSITION_NOTIFICATION_OPTIONS) {
            Some(options) => {
                let options = DispositionOptions::parse(options)?;
                (!options.protocol.trim().is_empty(), options.mic_algorithm)
            }
            None => (false, String::new()),
        };

    Ok(ReplyMdn {
        mdn_mode: request.mdn_mode,
        async_reply_to_url,
        signed_reply,
        mic_algorithm,
        body_text: body_text(message, disposition),
        headers,
        attributes,
        partner_id: request.sender_id.clone(),
        company_id: request.receiver_id.clone(),
    })
}

fn body_text(message: &IncomingFileMessage, disposition: &DispositionType) -> String {
    let request = &message.message;
    if disposition.is_success() {
        format!(
            "The AS2 message {} sent by {} to {} was received and processed. \
             This receipt does not guarantee that the content was read or understood.",
            request.message_id, request.sender_id, request.receiver_id
        )
    } else {
        format!(
            "The AS2 message {} sent by {} to {} could not be processed: {}",
            request.message_id, request.sender_id, request.receiver_id, disposition
        )
    }
}
