//! Merkle tree over content digests.

pub mod node;
pub mod proof;
pub mod tree;

use thiserror::Error;

use crate::core::crypto::Digest;

pub use node::{Node, NodeId};
pub use proof::{verify_proof, Proof};
pub use tree::MerkleTree;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MerkleError {
    #[error("Invalid hash input: {0}")]
    HashInput(String),

    #[error("Leaf not found: {0}")]
    LeafNotFound(Digest),

    #[error("Tree has no leaves")]
    EmptyTree,
}

pub type Result<T> = std::result::Result<T, MerkleError>;
