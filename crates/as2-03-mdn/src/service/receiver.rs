//! Request handling for the async MDN listener.
//!
//! | Condition | Status | Body |
//! |-----------|--------|------|
//! | not a POST | 400 | `<METHOD> method not supported` |
//! | `AS2-From` / `AS2-To` missing or blank | 400 | names the header |
//! | empty entity | 400 | `The request did not contain an entity` |
//! | signature or certificate failure | 500 | error text |
//! | body is not `multipart/report` | 400 | `Mime body part was not recognized as an MDN` |
//! | report that does not parse | 400 | parse error |
//! | report | per `MdnReceiveStatus` | |

use std::sync::Arc;

use shared_crypto::{CertificateStore, SmimeProvider};
use shared_types::constants::header;
use shared_types::{ConnectionInfo, Headers, HttpReply, IncomingMessage, MimePart};
use tracing::{debug, error, info};

use crate::domain::report::is_report;
use crate::service::processor::AsyncMdnProcessor;
use crate::service::renderer::open_signed;

pub struct AsyncMdnReceiver {
    processor: Arc<AsyncMdnProcessor>,
    smime: Arc<dyn SmimeProvider>,
    certs: Arc<dyn CertificateStore>,
}

impl AsyncMdnReceiver {
    pub fn new(
        processor: Arc<AsyncMdnProcessor>,
        smime: Arc<dyn SmimeProvider>,
        certs: Arc<dyn CertificateStore>,
    ) -> Self {
        Self {
            processor,
            smime,
            certs,
        }
    }

    pub fn handle(&self, connection: ConnectionInfo, headers: Headers, body: Vec<u8>) -> HttpReply {
        let source = format!("{}:{}", connection.source_ip, connection.source_port);
        info!(
            phase = "async-mdn-receive",
            source = %source,
            "Async MDN request received"
        );
        let message = IncomingMessage::new(connection, headers);

        if let Err(reason) = validate_request(&message, &body) {
            error!("[as2-03] Invalid request: {}", reason);
            return HttpReply::text(400, reason);
        }

        let content_type = message.headers.get_or_empty(header::CONTENT_TYPE);
        let part = MimePart::from_entity(content_type, body);

        let part = match open_signed(
            part,
            &message.sender_id,
            self.smime.as_ref(),
            self.certs.as_ref(),
        ) {
            Ok(part) => part,
            Err(err) => {
                debug!("[as2-03] Security error on async MDN: {}", err);
                return HttpReply::text(500, err.to_string());
            }
        };

        if !is_report(&part) {
            error!("[as2-03] Mime body part was not valid or not an MDN");
            return HttpReply::text(400, "Mime body part was not recognized as an MDN");
        }

        match self.processor.process(&part) {
            Ok(status) => {
                let (code, text) = status.http_response();
                info!(
                    phase = "async-mdn-receive",
                    sender = %message.sender_id,
                    status = %status,
                    "Async MDN processed"
                );
                HttpReply::text(code, text)
            }
            Err(err) if err.is_malformed() => {
                debug!("[as2-03] Malformed async MDN: {}", err);
                HttpReply::text(400, err.to_string())
            }
            Err(err) => {
                error!("[as2-03] Error processing async MDN: {}", err);
                HttpReply::text(500, err.to_string())
            }
        }
    }
}

fn validate_request(message: &IncomingMessage, body: &[u8]) -> Result<(), String> {
    let method = &message.connection.request_method;
    if !method.eq_ignore_ascii_case("POST") {
        return Err(format!("{} method not supported", method));
    }
    for name in [header::AS2_FROM, header::AS2_TO] {
        if message.headers.get_non_blank(name).is_none() {
            return Err(format!("The required '{}' header was not present", name));
        }
    }
    if body.is_empty() {
        return Err("The request did not contain an entity".to_string());
    }
    Ok(())
}
