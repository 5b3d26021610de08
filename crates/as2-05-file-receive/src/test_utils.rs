use std::path::PathBuf;
use std::sync::Arc;

use as2_02_storage::{FileSystemStorage, StorageLayout, SystemDir};
use as2_03_mdn::{create_reply_mdn, AsyncMdnProcessor, AsyncMdnSender, ReplyRenderer};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::testing::{fake_identity, FakeSmime};
use shared_crypto::InMemoryKeyStore;
use shared_types::{
    ConnectionInfo, DispositionType, Headers, HttpTransport, IncomingFileMessage, IncomingMessage,
    OutboundRequest, PartnerRecord, PartnerRegistry, TransportError, TransportResponse,
};
use tempfile::TempDir;

use crate::service::{FileReceiverService, ReceiverDependencies};

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

/// A file POST from PartnerA to MyCompany, plus `extra`.
pub fn request_headers(extra: &[(&str, &str)]) -> Headers {
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
    headers
}

pub struct MockTransport {
    pub requests: Mutex<Vec<OutboundRequest>>,
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().push(request);
        Ok(TransportResponse {
            status: 200,
            headers: Headers::new(),
            body: Vec::new(),
        })
    }
}

/// We are MyCompany; PartnerA's certificate is known.
pub struct Fixture {
    _tmp: TempDir,
    pub storage: Arc<FileSystemStorage>,
    pub smime: Arc<FakeSmime>,
    pub certs: Arc<InMemoryKeyStore>,
    pub transport: Arc<MockTransport>,
    pub service: FileReceiverService,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileSystemStorage::open(StorageLayout::new(tmp.path())).unwrap());
        let smime = Arc::new(FakeSmime::new());
        let certs = InMemoryKeyStore::new();
        let (cert, key) = fake_identity("MyCompany");
        certs.insert("MyCompany", cert, Some(key));
        let (partner_cert, _) = fake_identity("PartnerA");
        certs.insert("PartnerA", partner_cert, None);
        let certs = Arc::new(certs);

        let mut partner = PartnerRecord::new("PartnerA");
        partner.email = "as2@partner-a.example".to_string();

        let transport = Arc::new(MockTransport {
            requests: Mutex::new(Vec::new()),
        });
        let mdn_sender = AsyncMdnSender::new(
            ReplyRenderer::new(smime.clone(), certs.clone()),
            transport.clone(),
        );
        let service = FileReceiverService::new(ReceiverDependencies {
            partners: Arc::new(PartnerRegistry::new(vec![partner])),
            storage: storage.clone(),
            smime: smime.clone(),
            certs: certs.clone(),
            processor: Arc::new(AsyncMdnProcessor::new(storage.clone())),
            mdn_sender: Arc::new(mdn_sender),
        });

        Self {
            _tmp: tmp,
            storage,
            smime,
            certs,
            transport,
            service,
        }
    }

    pub fn dir(&self, dir: SystemDir) -> PathBuf {
        self.storage.layout().dir(dir)
    }

    /// A signed async receipt from PartnerA for our message `original_id`.
    pub fn partner_async_receipt(&self, original_id: &str, mic: &str) -> (Headers, Vec<u8>) {
        let ours: Headers = [
            ("AS2-From", "MyCompany"),
            ("AS2-To", "PartnerA"),
            ("Message-ID", original_id),
            (
                "Disposition-Notification-Options",
                "signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha1",
            ),
            ("Receipt-Delivery-Option", "http://mycompany.example:10081"),
        ]
        .into_iter()
        .collect();
        let request = IncomingFileMessage::new(IncomingMessage::new(connection(), ours));
        let mut mdn = create_reply_mdn(&request, &DispositionType::success(), "").unwrap();
        mdn.attributes.received_content_mic = mic.to_string();

        let keys = InMemoryKeyStore::new();
        let (cert, key) = fake_identity("PartnerA");
        keys.insert("PartnerA", cert, Some(key));
        let reply = ReplyRenderer::new(Arc::new(FakeSmime::new()), Arc::new(keys)).http_reply(&mdn);
        (reply.headers, reply.body)
    }
}
