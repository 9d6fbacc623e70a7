// src/utils/error.rs
use thiserror::Error;

use crate::core::merkle::MerkleError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Merkle tree error: {0}")]
    Merkle(#[from] MerkleError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upload of {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected request ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl VaultError {
    /// True when the server answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, VaultError::Server { status: 404, .. })
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(error: reqwest::Error) -> Self {
        VaultError::Network(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VaultError>;
