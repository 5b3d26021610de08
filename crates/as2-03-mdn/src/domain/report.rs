//! `multipart/report` encoding of MDNs.

use shared_types::constants::header;
use shared_types::mime::parse_header_block;
use shared_types::{Headers, IncomingMdn, MdnAttributes, MimePart, Multipart};

use crate::domain::errors::MdnError;
use crate::domain::reply::ReplyMdn;

const REPORT_SUBTYPE: &str = "report; report-type=disposition-notification";
const NOTIFICATION_TYPE: &str = "message/disposition-notification";

/// Whether `part` is a `multipart/report`, i.e. carries an MDN.
pub fn is_report(part: &MimePart) -> bool {
    part.is_mime_type("multipart/report")
}

/// Encodes `mdn` as an unsigned report part.
pub fn build_report(mdn: &ReplyMdn) -> MimePart {
    let attributes = &mdn.attributes;
    let fields = [
        (header::REPORTING_UA, &attributes.reporting_ua),
        (header::ORIGINAL_RECIPIENT, &attributes.original_recipient),
        (header::FINAL_RECIPIENT, &attributes.final_recipient),
        (header::ORIGINAL_MESSAGE_ID, &attributes.original_message_id),
        (header::DISPOSITION, &attributes.content_disposition),
        (header::RECEIVED_CONTENT_MIC, &attributes.received_content_mic),
    ];

    let mut body = String::new();
    for (name, value) in fields {
        if value.is_empty() {
            continue;
        }
        body.push_str(name);
        body.push_str(": ");
        body.push_str(value);
        body.push_str("\r\n");
    }

    let mut report = Multipart::new(REPORT_SUBTYPE);
    report.push(MimePart::text(&mdn.body_text));
    report.push(MimePart::from_entity(NOTIFICATION_TYPE, body.into_bytes()));
    report.into_part()
}

/// Reads the text and the notification fields out of a report.
///
/// # Errors
///
/// - `NotAReport`: `part` is not `multipart/report`
/// - `MissingNotification`: no `message/disposition-notification` part
/// - `Mime`: the multipart or the field block does not parse
pub fn parse_report(part: &MimePart) -> Result<IncomingMdn, MdnError> {
    if !is_report(part) {
        return Err(MdnError::NotAReport(part.content_type_value().to_string()));
    }

    let report = Multipart::parse(part)?;
    let mut mdn = IncomingMdn::default();
    let mut found = false;

    for inner in report.parts() {
        if inner.is_mime_type("text/plain") {
            mdn.body_text = String::from_utf8_lossy(inner.body()).into_owned();
        } else if inner.is_mime_type(NOTIFICATION_TYPE) {
            let fields = parse_header_block(inner.body())?;
            mdn.attributes = attributes_from(&fields);
            found = true;
        }
    }

    if !found {
        return Err(MdnError::MissingNotification);
    }
    Ok(mdn)
}

fn attributes_from(fields: &Headers) -> MdnAttributes {
    let field = |name: &str| fields.get_or_empty(name).trim().to_string();
    MdnAttributes {
        reporting_ua: field(header::REPORTING_UA),
        original_recipient: field(header::ORIGINAL_RECIPIENT),
        final_recipient: field(header::FINAL_RECIPIENT),
        original_message_id: field(header::ORIGINAL_MESSAGE_ID),
        content_disposition: field(header::DISPOSITION),
        received_content_mic: field(header::RECEIVED_CONTENT_MIC),
    }
}
