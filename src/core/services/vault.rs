// src/core/services/vault.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    core::{
        crypto::Digest,
        integrity::{leaf_digest, FileBundle},
        merkle::{MerkleError, MerkleTree},
    },
    storage::{validate_filename, FileStore, LocalFileStore, StorageError},
    utils::{
        config::Config,
        error::{Result, VaultError},
    },
};

#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    pub filename: String,
    pub hash: Digest,
    pub leaf_index: usize,
    pub root: Digest,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootStatus {
    pub root: Option<Digest>,
    pub leaf_count: usize,
}

/// Server-side owner of the authoritative tree and the stored files.
///
/// The tree sits behind one mutex: uploads rebuild it while holding the lock
/// and proof generation walks it under the same lock, so a reader never sees
/// a half-rebuilt arena.
pub struct VaultService {
    store: Arc<dyn FileStore>,
    tree: Mutex<MerkleTree>,
    max_upload_bytes: usize,
}

impl VaultService {
    pub fn new(store: Arc<dyn FileStore>, max_upload_bytes: usize) -> Self {
        Self {
            store,
            tree: Mutex::new(MerkleTree::new()),
            max_upload_bytes,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = LocalFileStore::new(config.upload_dir()).await?;
        Ok(Self::new(Arc::new(store), config.server.max_upload_bytes))
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    /// Stores the file and appends the digest of the bytes as stored.
    pub async fn upload(&self, filename: &str, data: &[u8]) -> Result<UploadReceipt> {
        validate_filename(filename)?;
        if data.len() > self.max_upload_bytes {
            return Err(VaultError::PayloadTooLarge {
                size: data.len(),
                limit: self.max_upload_bytes,
            });
        }

        self.store.save(filename, data).await?;
        info!("File {} saved ({} bytes)", filename, data.len());

        // Hash what landed on disk, not what arrived on the wire.
        let stored = self
            .store
            .load(filename)
            .await?
            .ok_or_else(|| StorageError::NotFound(filename.to_owned()))?;
        let hash = leaf_digest(&stored);
        info!("Computed hash for {}: {}", filename, hash);

        let (leaf_index, root) = {
            let mut tree = self.tree.lock();
            let leaf_index = tree.add_leaf(hash.clone());
            (leaf_index, tree.root_digest()?.clone())
        };
        info!(leaf_index, root = %root, "File hash {} added to the Merkle tree", hash);

        Ok(UploadReceipt {
            filename: filename.to_owned(),
            hash,
            leaf_index,
            root,
            uploaded_at: Utc::now(),
        })
    }

    /// Returns the stored bytes, their digest and an audit path to the
    /// current root.
    pub async fn request_file(&self, filename: &str) -> Result<FileBundle> {
        let data = self
            .store
            .load(filename)
            .await?
            .ok_or_else(|| StorageError::NotFound(filename.to_owned()))?;
        let hash = leaf_digest(&data);

        let proof = self.tree.lock().generate_proof(&hash).map_err(|e| {
            if matches!(e, MerkleError::LeafNotFound(_) | MerkleError::EmptyTree) {
                warn!("File {} is stored but its hash {} is not in the tree", filename, hash);
            }
            VaultError::from(e)
        })?;

        Ok(FileBundle::new(&data, hash, proof))
    }

    pub fn root_status(&self) -> RootStatus {
        let tree = self.tree.lock();
        RootStatus {
            root: tree.root_digest().ok().cloned(),
            leaf_count: tree.leaf_count(),
        }
    }
}
