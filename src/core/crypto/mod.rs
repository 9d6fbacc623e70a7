//! Cryptographic primitives

pub mod hash;

pub use hash::{combine, hash_bytes, hash_file, hash_reader, Digest, DIGEST_HEX_LEN};
