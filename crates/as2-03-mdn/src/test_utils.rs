use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    ConnectionInfo, Headers, HttpTransport, IncomingFileMessage, IncomingMessage,
    OutboundRequest, TransportError, TransportResponse,
};

pub fn connection() -> ConnectionInfo {
    ConnectionInfo {
        source_ip: "10.0.0.2".to_string(),
        source_port: 40000,
        destination_ip: "10.0.0.1".to_string(),
        destination_port: 10080,
        request_method: "POST".to_string(),
        request_uri: "/".to_string(),
    }
}

/// A file message from PartnerA to MyCompany, plus `extra` request headers.
pub fn file_message(extra: &[(&str, &str)]) -> IncomingFileMessage {
    let mut headers: Headers = [
        ("AS2-From", "PartnerA"),
        ("AS2-To", "MyCompany"),
        ("Message-ID", "<msg-1@partner>"),
        ("Content-Type", "application/EDIFACT"),
    ]
    .into_iter()
    .collect();
    for (name, value) in extra {
        headers.set(*name, *value);
    }
    IncomingFileMessage::new(IncomingMessage::new(connection(), headers))
}

/// Records every request and answers with a fixed status.
pub struct MockTransport {
    pub status: u16,
    pub requests: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    pub fn new(status: u16) -> Arc<Self> {
        Arc::new(Self {
            status,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request);
        Ok(TransportResponse {
            status: self.status,
            headers: Headers::new(),
            body: Vec::new(),
        })
    }
}
