use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use as2_02_storage::{StorageLayout, SystemDir};
use as2_06_scheduler::MockTimeSource;
use node_runtime::adapters::ReqwestTransport;
use node_runtime::{AppContext, Collaborators, NodeConfig, NodeRuntime};
use shared_crypto::testing::{fake_identity, FakeSmime};
use shared_types::{PartnerRecord, SendSettings};
use tempfile::TempDir;

pub const COMPANY: &str = "MyCompany";
pub const PARTNER: &str = "PartnerA";
pub const START: u64 = 1_000_000;

/// Distinct ports nothing listens on right now. All are held until the
/// last one is picked so the OS cannot hand out the same port twice.
fn free_ports<const N: usize>() -> [u16; N] {
    let held: Vec<TcpListener> = (0..N)
        .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
        .collect();
    std::array::from_fn(|i| held[i].local_addr().unwrap().port())
}

fn email(as2id: &str) -> String {
    format!("as2@{}.example", as2id.to_ascii_lowercase())
}

/// Own key pair plus the counterpart's certificate, under `{home}/certs`.
fn install_certificates(home: &Path, me: &str, other: &str) {
    let certs = StorageLayout::new(home).dir(SystemDir::Certs);
    fs::create_dir_all(&certs).unwrap();
    let (cert, key) = fake_identity(me);
    fs::write(certs.join(format!("{}.cer", me)), cert.as_bytes()).unwrap();
    fs::write(certs.join(format!("{}.key", me)), key.as_bytes()).unwrap();
    let (other_cert, _) = fake_identity(other);
    fs::write(certs.join(format!("{}.cer", other)), other_cert.as_bytes()).unwrap();
}

/// One running node with its own home directory and clock.
pub struct Node {
    _tmp: TempDir,
    pub runtime: NodeRuntime,
    pub time: Arc<MockTimeSource>,
    pub smime: Arc<FakeSmime>,
}

struct NodeSetup<'a> {
    me: &'a str,
    other: &'a str,
    file_port: u16,
    mdn_port: u16,
    other_file_port: u16,
    settings: SendSettings,
}

impl Node {
    async fn start(setup: NodeSetup<'_>) -> Self {
        let tmp = tempfile::tempdir().unwrap();
        install_certificates(tmp.path(), setup.me, setup.other);

        let mut config = NodeConfig::default();
        config.server.home = tmp.path().to_path_buf();
        config.server.bind_address = "127.0.0.1".to_string();
        config.server.url = "http://127.0.0.1".to_string();
        config.server.file_port = setup.file_port;
        config.server.mdn_port = setup.mdn_port;
        config.company.as2id = setup.me.to_string();
        config.company.email = email(setup.me);
        let mut partner = PartnerRecord::new(setup.other);
        partner.email = email(setup.other);
        partner.send_settings = setup.settings;
        partner.send_settings.url = format!("http://127.0.0.1:{}", setup.other_file_port);
        config.partners.push(partner);

        let time = Arc::new(MockTimeSource::new(START));
        let smime = Arc::new(FakeSmime::new());
        let edges = Collaborators {
            smime: smime.clone(),
            transport: Arc::new(ReqwestTransport::new().unwrap()),
            time: time.clone(),
        };
        let runtime = NodeRuntime::new(AppContext::build(config, edges).unwrap());
        runtime.start().await.unwrap();

        Self {
            _tmp: tmp,
            runtime,
            time,
            smime,
        }
    }

    pub fn context(&self) -> Arc<AppContext> {
        self.runtime.context()
    }

    pub fn dir(&self, dir: SystemDir) -> PathBuf {
        self.context().storage.layout().dir(dir)
    }

    /// Drops `data` into the outbox for `partner`.
    pub fn write_outbox(&self, partner: &str, name: &str, data: &[u8]) -> PathBuf {
        let dir = self.context().outbox(partner);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    pub fn mdn_count(&self) -> usize {
        fs::read_dir(self.dir(SystemDir::Mdn))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// MyCompany and PartnerA, each configured with the other as its partner.
pub struct Pair {
    pub company: Node,
    pub partner: Node,
}

impl Pair {
    /// `configure` adjusts how MyCompany sends to PartnerA.
    pub async fn start(configure: impl FnOnce(&mut SendSettings)) -> Self {
        let [company_file, company_mdn, partner_file, partner_mdn] = free_ports();

        let mut settings = SendSettings::default();
        configure(&mut settings);

        let partner = Node::start(NodeSetup {
            me: PARTNER,
            other: COMPANY,
            file_port: partner_file,
            mdn_port: partner_mdn,
            other_file_port: company_file,
            settings: SendSettings::default(),
        })
        .await;
        let company = Node::start(NodeSetup {
            me: COMPANY,
            other: PARTNER,
            file_port: company_file,
            mdn_port: company_mdn,
            other_file_port: partner_file,
            settings,
        })
        .await;

        Self { company, partner }
    }

    pub async fn stop(self) {
        self.company.runtime.shutdown(Duration::from_secs(5)).await;
        self.partner.runtime.shutdown(Duration::from_secs(5)).await;
    }
}

/// Polls `condition` for up to five seconds.
pub async fn eventually(condition: impl Fn() -> bool) -> bool {
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    condition()
}
