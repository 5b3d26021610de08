//! Process lifecycle: listeners, outbox watches, scheduler loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapters::http_listener::{file_router, mdn_router, serve};
use crate::container::AppContext;

/// Where the listeners actually bound (matters when a port is 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundAddresses {
    pub file: SocketAddr,
    pub mdn: SocketAddr,
}

/// The main node runtime orchestrating all subsystems.
pub struct NodeRuntime {
    context: Arc<AppContext>,
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl NodeRuntime {
    pub fn new(context: AppContext) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            context: Arc::new(context),
            shutdown_tx,
            shutdown_rx,
            tasks: Mutex::new(Vec::new()),
        }
    }

    /// Start the node runtime.
    ///
    /// ## Startup Sequence
    ///
    /// 1. Bind the file and MDN listeners
    /// 2. Watch every partner outbox
    /// 3. Start the scheduler loop
    pub async fn start(&self) -> Result<BoundAddresses> {
        info!("===========================================");
        info!("  AS2 Node Runtime v{}", env!("CARGO_PKG_VERSION"));
        info!("===========================================");

        let server = &self.context.config.server;
        let file_listener = TcpListener::bind(server.file_addr()?)
            .await
            .with_context(|| format!("Cannot bind file port {}", server.file_port))?;
        let mdn_listener = TcpListener::bind(server.mdn_addr()?)
            .await
            .with_context(|| format!("Cannot bind MDN port {}", server.mdn_port))?;
        let bound = BoundAddresses {
            file: file_listener.local_addr()?,
            mdn: mdn_listener.local_addr()?,
        };

        let file_app = file_router(Arc::clone(&self.context.receiver), bound.file);
        let mdn_app = mdn_router(Arc::clone(&self.context.mdn_receiver), bound.mdn);
        self.spawn_listener("file", file_listener, file_app);
        self.spawn_listener("mdn", mdn_listener, mdn_app);

        self.context.watch_outboxes()?;
        let scheduler = Arc::clone(&self.context.scheduler);
        let shutdown = self.shutdown_rx.clone();
        self.tasks
            .lock()
            .push(tokio::spawn(async move { scheduler.run(shutdown).await }));

        info!("File port: {}", bound.file);
        info!("MDN port: {}", bound.mdn);
        info!("Async MDN URL: {}", server.async_mdn_url());
        info!("Home: {}", server.home.display());
        Ok(bound)
    }

    fn spawn_listener(&self, name: &'static str, listener: TcpListener, router: axum::Router) {
        let shutdown = self.shutdown_rx.clone();
        self.tasks.lock().push(tokio::spawn(async move {
            if let Err(e) = serve(listener, router, shutdown).await {
                error!("[http] {} listener failed: {}", name, e);
            }
            info!("[http] {} listener stopped", name);
        }));
    }

    /// Shutdown the node gracefully.
    ///
    /// Listeners stop accepting, the scheduler loop exits. Pipelines in
    /// flight run to completion, bounded by `grace`.
    pub async fn shutdown(&self, grace: Duration) {
        info!("Initiating graceful shutdown...");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }

        let tasks: Vec<_> = self.tasks.lock().drain(..).collect();
        for task in tasks {
            match tokio::time::timeout(grace, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("Task ended abnormally: {}", e),
                Err(_) => warn!("Task still running after {:?}", grace),
            }
        }
        info!("Shutdown complete");
    }

    pub fn context(&self) -> Arc<AppContext> {
        Arc::clone(&self.context)
    }
}
