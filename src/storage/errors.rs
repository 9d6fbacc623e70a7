// src/storage/errors.rs
use thiserror::Error;

use crate::core::merkle::MerkleError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Stored root hash is invalid: {0}")]
    InvalidRoot(#[from] MerkleError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
