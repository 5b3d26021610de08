//! # Application Context
//!
//! Holds every service instance of the node. Built once at startup.
//!
//! ```text
//! storage ─┬─→ AsyncMdnProcessor ─┬─→ FileReceiverService (file port)
//!          │                      └─→ AsyncMdnReceiver    (MDN port)
//!          └─→ FileSenderService ──→ FileSenderAdapter ──→ DirectoryPollingService
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use as2_02_storage::{DirectoryLock, FileSystemStorage, StorageLayout, SystemDir};
use as2_03_mdn::{AsyncMdnProcessor, AsyncMdnReceiver, AsyncMdnSender, ReplyRenderer};
use as2_04_file_send::{FileSenderService, SendConfig, SenderDependencies};
use as2_05_file_receive::{FileReceiverService, ReceiverDependencies};
use as2_06_scheduler::{DirectoryPollingService, SchedulerApi, SystemTimeSource, TimeSource};
use shared_crypto::{DisabledSmime, InMemoryKeyStore, SmimeProvider};
use shared_types::{HttpTransport, PartnerDirectory, PartnerRegistry};
use tracing::{info, warn};

use crate::adapters::file_sender::FileSenderAdapter;
use crate::adapters::http_transport::ReqwestTransport;
use crate::container::config::NodeConfig;

/// The pluggable edges of the node.
pub struct Collaborators {
    pub smime: Arc<dyn SmimeProvider>,
    pub transport: Arc<dyn HttpTransport>,
    pub time: Arc<dyn TimeSource>,
}

impl Collaborators {
    /// reqwest for outbound POSTs, the system clock, and no CMS backend:
    /// plain exchanges work, signed or encrypted ones are refused.
    pub fn production() -> Result<Self> {
        Ok(Self {
            smime: Arc::new(DisabledSmime),
            transport: Arc::new(ReqwestTransport::new().context("Failed to build HTTP client")?),
            time: Arc::new(SystemTimeSource),
        })
    }
}

pub struct AppContext {
    pub config: NodeConfig,
    pub storage: Arc<FileSystemStorage>,
    pub partners: Arc<PartnerRegistry>,
    pub certs: Arc<InMemoryKeyStore>,
    pub sender: Arc<FileSenderService>,
    pub receiver: Arc<FileReceiverService>,
    pub mdn_receiver: Arc<AsyncMdnReceiver>,
    pub scheduler: Arc<DirectoryPollingService>,
    _lock: DirectoryLock,
}

impl AppContext {
    /// Opens storage, loads certificates and wires the services.
    ///
    /// ## Errors
    ///
    /// - invalid configuration
    /// - the system directory is locked by another node
    /// - storage directories cannot be created
    pub fn build(config: NodeConfig, edges: Collaborators) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let layout = StorageLayout::new(&config.server.home);
        let lock = DirectoryLock::acquire(&layout.dir(SystemDir::System))
            .context("Cannot take ownership of the system directory")?;
        let storage = Arc::new(FileSystemStorage::open(layout).context("Cannot open storage")?);

        let certs = Arc::new(InMemoryKeyStore::new());
        load_certificates(&config, &storage.layout().dir(SystemDir::Certs), &certs);

        let partners = Arc::new(PartnerRegistry::new(config.partners.clone()));
        let processor = Arc::new(AsyncMdnProcessor::new(storage.clone()));

        let sender = Arc::new(FileSenderService::new(SenderDependencies {
            partners: partners.clone(),
            storage: storage.clone(),
            smime: edges.smime.clone(),
            certs: certs.clone(),
            transport: edges.transport.clone(),
            config: SendConfig {
                company_email: config.company.email.clone(),
                async_mdn_url: config.server.async_mdn_url(),
            },
        }));

        let mdn_sender = Arc::new(AsyncMdnSender::new(
            ReplyRenderer::new(edges.smime.clone(), certs.clone()),
            edges.transport.clone(),
        ));
        let receiver = Arc::new(FileReceiverService::new(ReceiverDependencies {
            partners: partners.clone(),
            storage: storage.clone(),
            smime: edges.smime.clone(),
            certs: certs.clone(),
            processor: processor.clone(),
            mdn_sender,
        }));

        let mdn_receiver = Arc::new(AsyncMdnReceiver::new(
            processor,
            edges.smime.clone(),
            certs.clone(),
        ));

        let scheduler = Arc::new(DirectoryPollingService::new(
            Arc::new(FileSenderAdapter::new(sender.clone())),
            edges.time,
            config.scheduler.clone(),
        ));

        info!(
            company = %config.company.as2id,
            partners = config.partners.len(),
            home = %config.server.home.display(),
            "Application context built"
        );

        Ok(Self {
            config,
            storage,
            partners,
            certs,
            sender,
            receiver,
            mdn_receiver,
            scheduler,
            _lock: lock,
        })
    }

    /// `outbox/<partner>`; files dropped there go from the company to that partner.
    pub fn outbox(&self, partner_id: &str) -> PathBuf {
        self.storage.layout().dir(SystemDir::Outbox).join(partner_id)
    }

    /// Starts a scheduler watch on each partner's outbox.
    pub fn watch_outboxes(&self) -> Result<()> {
        let company = &self.config.company.as2id;
        for partner in self.partners.partners() {
            let dir = self.outbox(&partner.as2id);
            self.scheduler
                .watch_directory(&dir, company, &partner.as2id)
                .with_context(|| format!("Cannot watch {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Registers `{certs}/{as2id}.cer` for every identity, plus `{as2id}.key`
/// for the company. A record's `certificate` field replaces the default
/// file name. Missing files are logged; the identity then only works for
/// unprotected exchanges.
fn load_certificates(config: &NodeConfig, certs_dir: &Path, store: &InMemoryKeyStore) {
    let company = &config.company;
    let key = certs_dir.join(format!("{}.key", company.as2id));
    let key = key.exists().then_some(key);
    load_identity(
        store,
        &company.as2id,
        &certificate_path(certs_dir, &company.as2id, &company.certificate),
        key.as_deref(),
    );

    for partner in &config.partners {
        load_identity(
            store,
            &partner.as2id,
            &certificate_path(certs_dir, &partner.as2id, &partner.certificate),
            None,
        );
    }
}

fn certificate_path(certs_dir: &Path, as2id: &str, configured: &str) -> PathBuf {
    if configured.trim().is_empty() {
        certs_dir.join(format!("{}.cer", as2id))
    } else {
        certs_dir.join(configured.trim())
    }
}

fn load_identity(store: &InMemoryKeyStore, as2id: &str, cert: &Path, key: Option<&Path>) {
    if !cert.exists() {
        warn!(as2id = %as2id, path = %cert.display(), "No certificate found");
        return;
    }
    if let Err(err) = store.load_files(as2id, cert, key) {
        warn!(as2id = %as2id, error = %err, "Cannot load certificate");
    }
}
