pub mod api;
pub mod client;
pub mod core;
pub mod storage;
pub mod utils;

use std::{net::SocketAddr, sync::Arc};

use actix_web::dev::{Server, ServerHandle};
use parking_lot::Mutex;
use tracing::info;

use crate::{
    api::RestApi,
    core::services::VaultService,
    utils::{config::Config, error::Result},
};

pub use crate::core::{
    crypto::{combine, hash_bytes, Digest},
    merkle::{verify_proof, MerkleError, MerkleTree, Proof},
};

pub struct Application {
    config: Arc<Config>,
    service: Arc<VaultService>,
    server_handle: Mutex<Option<ServerHandle>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl Application {
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing file storage at {}...", config.storage.upload_dir);
        let service = Arc::new(VaultService::from_config(&config).await?);

        Ok(Self {
            config,
            service,
            server_handle: Mutex::new(None),
            local_addr: Mutex::new(None),
        })
    }

    pub fn service(&self) -> Arc<VaultService> {
        self.service.clone()
    }

    /// Binds the API server. The returned future must be awaited to serve.
    pub fn start(&self) -> Result<Server> {
        info!(
            "Starting API server on {}:{}...",
            self.config.server.host, self.config.server.port
        );
        let (server, local_addr) = RestApi::new(
            self.config.server.host.clone(),
            self.config.server.port,
            self.service.clone(),
        )
        .bind()?;

        info!("API server listening on {}", local_addr);
        *self.server_handle.lock() = Some(server.handle());
        *self.local_addr.lock() = Some(local_addr);
        Ok(server)
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock()
    }

    pub async fn shutdown(&self) {
        info!("Shutting down application...");
        let handle = self.server_handle.lock().take();
        if let Some(handle) = handle {
            handle.stop(true).await;
        }

        let status = self.service.root_status();
        info!(
            leaf_count = status.leaf_count,
            root = ?status.root,
            "Final Merkle tree state"
        );
    }
}
