// tests/common/mod.rs
#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use actix_web::dev::ServerHandle;
use merkle_vault::{
    api::RestApi,
    core::services::VaultService,
    hash_bytes,
    storage::LocalFileStore,
    Digest,
};

pub const MAX_UPLOAD: usize = 64 * 1024;

pub fn digests(n: usize) -> Vec<Digest> {
    (0..n).map(|i| hash_bytes(format!("file-{}", i).as_bytes())).collect()
}

/// Flips the lowest bit of the hex nibble at `position`, giving a different
/// well-formed digest.
pub fn flip_nibble(digest: &Digest, position: usize) -> Digest {
    let mut chars: Vec<char> = digest.as_str().chars().collect();
    let value = chars[position].to_digit(16).unwrap() ^ 1;
    chars[position] = std::char::from_digit(value, 16).unwrap();
    Digest::parse(&chars.into_iter().collect::<String>()).unwrap()
}

pub async fn vault_service(dir: &Path) -> Arc<VaultService> {
    let store = LocalFileStore::new(dir).await.unwrap();
    Arc::new(VaultService::new(Arc::new(store), MAX_UPLOAD))
}

pub struct TestServer {
    pub url: String,
    pub service: Arc<VaultService>,
    handle: ServerHandle,
}

impl TestServer {
    /// Serves a fresh vault rooted at `dir` on an ephemeral port.
    pub async fn start(dir: &Path) -> Self {
        let service = vault_service(dir).await;
        let (server, addr) = RestApi::new("127.0.0.1", 0, service.clone()).bind().unwrap();
        let handle = server.handle();
        actix_rt::spawn(server);
        Self {
            url: format!("http://{}", addr),
            service,
            handle,
        }
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}
