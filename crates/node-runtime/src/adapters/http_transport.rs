//! Outbound POSTs through reqwest.
//!
//! No request timeout is configured; a stalled partner is only cut off by
//! the connection itself failing.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use shared_types::{Headers, HttpTransport, OutboundRequest, TransportError, TransportResponse};
use tracing::debug;

pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, reqwest::Error> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }
}

fn header_map(headers: &Headers) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::new();
    for (name, value) in headers.iter() {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TransportError::InvalidRequest(format!("header {}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| TransportError::InvalidRequest(format!("header {}: {}", name, e)))?;
        map.append(header_name, header_value);
    }
    Ok(map)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let url = request.url.clone();
        let connection_error = |e: reqwest::Error| TransportError::Connection {
            url: url.clone(),
            reason: e.to_string(),
        };

        debug!(url = %url, bytes = request.body.len(), "[http] POST");
        let response = self
            .client
            .post(&request.url)
            .headers(header_map(&request.headers)?)
            .body(request.body)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    TransportError::InvalidRequest(e.to_string())
                } else {
                    connection_error(e)
                }
            })?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await.map_err(connection_error)?.to_vec();
        debug!(url = %url, status, bytes = body.len(), "[http] Response");

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_map_keeps_values() {
        let headers: Headers = [("AS2-From", "MyCompany"), ("Message-ID", "<a@b>")]
            .into_iter()
            .collect();
        let map = header_map(&headers).unwrap();
        assert_eq!(map.get("as2-from").unwrap(), "MyCompany");
        assert_eq!(map.get("message-id").unwrap(), "<a@b>");
    }

    #[test]
    fn test_header_map_rejects_bad_value() {
        let headers: Headers = [("Subject", "line\nbreak")].into_iter().collect();
        assert!(matches!(
            header_map(&headers),
            Err(TransportError::InvalidRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = ReqwestTransport::new().unwrap();
        let err = transport
            .post(OutboundRequest {
                url: format!("http://{}", addr),
                headers: Headers::new(),
                body: b"UNB".to_vec(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection { .. }));
    }
}
