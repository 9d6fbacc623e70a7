// src/api/rest.rs
use std::{net::SocketAddr, sync::Arc};

use actix_web::{dev::Server, web, App, HttpServer};

use crate::{
    api::handlers,
    core::services::VaultService,
    utils::error::{Result, VaultError},
};

pub struct RestApi {
    host: String,
    port: u16,
    service: Arc<VaultService>,
}

impl RestApi {
    pub fn new(host: impl Into<String>, port: u16, service: Arc<VaultService>) -> Self {
        Self {
            host: host.into(),
            port,
            service,
        }
    }

    /// Binds the listener and returns the server future, not yet driven,
    /// with the address actually bound (useful with port 0).
    pub fn bind(&self) -> Result<(Server, SocketAddr)> {
        let service = web::Data::from(self.service.clone());
        let payload_limit = self.service.max_upload_bytes();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(service.clone())
                .app_data(web::PayloadConfig::new(payload_limit))
                .service(handlers::files::scope())
        })
        .bind((self.host.as_str(), self.port))
        .map_err(|e| VaultError::Config(format!("Failed to bind API server: {}", e)))?
        .disable_signals();

        let local_addr = server
            .addrs()
            .first()
            .copied()
            .ok_or_else(|| VaultError::Config("API server bound no address".into()))?;

        Ok((server.run(), local_addr))
    }
}
