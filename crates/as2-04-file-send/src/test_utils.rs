use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use as2_02_storage::{FileSystemStorage, StorageLayout, SystemDir};
use as2_03_mdn::{create_reply_mdn, ReplyRenderer};
use async_trait::async_trait;
use parking_lot::Mutex;
use shared_crypto::testing::{fake_identity, FakeSmime};
use shared_crypto::{calculate_mic, InMemoryKeyStore};
use shared_types::{
    ConnectionInfo, DispositionType, HttpTransport, IncomingFileMessage, IncomingMessage, MdnMode,
    MimePart, OutboundRequest, OutgoingFileMessage, PartnerRecord, PartnerRegistry,
    TransportError, TransportResponse,
};
use tempfile::TempDir;

use crate::domain::headers::SendConfig;
use crate::service::{FileSenderService, SenderDependencies};
use crate::stages::EnvelopeMimeBody;

/// PartnerA, reachable at `http://partner-a.example:10080`.
pub fn partner(mode: MdnMode) -> PartnerRecord {
    let mut partner = PartnerRecord::new("PartnerA");
    partner.email = "as2@partner-a.example".to_string();
    partner.send_settings.url = "http://partner-a.example:10080".to_string();
    partner.send_settings.mdn_mode = mode;
    partner
}

/// MyCompany with its key pair, and PartnerA's certificate, in a temp home.
pub struct Fixture {
    _tmp: TempDir,
    pub storage: Arc<FileSystemStorage>,
    pub smime: Arc<FakeSmime>,
    pub certs: Arc<InMemoryKeyStore>,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileSystemStorage::open(StorageLayout::new(tmp.path())).unwrap());
        let certs = InMemoryKeyStore::new();
        let (cert, key) = fake_identity("MyCompany");
        certs.insert("MyCompany", cert, Some(key));
        let (partner_cert, _) = fake_identity("PartnerA");
        certs.insert("PartnerA", partner_cert, None);
        Self {
            _tmp: tmp,
            storage,
            smime: Arc::new(FakeSmime::new()),
            certs: Arc::new(certs),
        }
    }

    pub fn dir(&self, dir: SystemDir) -> PathBuf {
        self.storage.layout().dir(dir)
    }

    pub fn outbox(&self) -> PathBuf {
        let dir = self.dir(SystemDir::Outbox).join("PartnerA");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Writes `data` to the PartnerA outbox and wraps it in a message.
    pub fn outgoing(&self, name: &str, data: &[u8]) -> OutgoingFileMessage {
        let path = self.outbox().join(name);
        fs::write(&path, data).unwrap();
        OutgoingFileMessage::new(path, "MyCompany", "PartnerA")
    }

    pub fn envelope(&self) -> EnvelopeMimeBody {
        EnvelopeMimeBody::new(self.smime.clone(), self.certs.clone())
    }

    pub fn service(
        &self,
        transport: Arc<ScriptedTransport>,
        partner: PartnerRecord,
    ) -> FileSenderService {
        FileSenderService::new(SenderDependencies {
            partners: Arc::new(PartnerRegistry::new(vec![partner])),
            storage: self.storage.clone(),
            smime: self.smime.clone(),
            certs: self.certs.clone(),
            transport,
            config: SendConfig {
                company_email: "as2@mycompany.example".to_string(),
                async_mdn_url: "http://mycompany.example:10081".to_string(),
            },
        })
    }
}

type Responder = dyn Fn(&OutboundRequest) -> Result<TransportResponse, TransportError> + Send + Sync;

/// Records every request and answers through a closure.
pub struct ScriptedTransport {
    responder: Box<Responder>,
    pub requests: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn new(
        responder: impl Fn(&OutboundRequest) -> Result<TransportResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let response = (self.responder)(&request);
        self.requests.lock().push(request);
        response
    }
}

/// The receipt PartnerA returns for an unprotected `request`, signed with
/// PartnerA's key. The MIC is computed over the body unless `mic` is given.
pub fn partner_reply(
    request: &OutboundRequest,
    disposition: &DispositionType,
    mic: Option<&str>,
) -> TransportResponse {
    let incoming = IncomingFileMessage::new(IncomingMessage::new(
        ConnectionInfo::default(),
        request.headers.clone(),
    ));
    let mut mdn = create_reply_mdn(&incoming, disposition, "as2@mycompany.example").unwrap();
    mdn.attributes.received_content_mic = match mic {
        Some(mic) => mic.to_string(),
        None => {
            let content = MimePart::from_entity(
                request.headers.get_or_empty("Content-Type"),
                request.body.clone(),
            );
            calculate_mic(&content, &mdn.mic_algorithm, false).unwrap()
        }
    };

    let keys = InMemoryKeyStore::new();
    let (cert, key) = fake_identity("PartnerA");
    keys.insert("PartnerA", cert, Some(key));
    let reply = ReplyRenderer::new(Arc::new(FakeSmime::new()), Arc::new(keys)).http_reply(&mdn);
    TransportResponse {
        status: reply.status,
        headers: reply.headers,
        body: reply.body,
    }
}
