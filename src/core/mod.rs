//! Hashing, the Merkle tree and the integrity rules built on them.

pub mod crypto;
pub mod integrity;
pub mod merkle;
pub mod services;
