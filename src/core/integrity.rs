// src/core/integrity.rs
//! Contract between the uploading side and the verifying side.
//!
//! A file's leaf digest is [`hash_bytes`] over its exact stored bytes. The
//! server answers a retrieval with a [`FileBundle`]; the verifier accepts it
//! only when the bytes hash to the advertised leaf digest and the proof leads
//! from that digest to the root it kept from upload time.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::crypto::{hash_bytes, Digest};
use crate::core::merkle::{verify_proof, MerkleTree, Proof};

/// What a server hands back for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileBundle {
    /// Hex-encoded file bytes.
    pub file_data: String,
    pub file_hash: Digest,
    pub proof: Proof,
}

impl FileBundle {
    pub fn new(data: &[u8], file_hash: Digest, proof: Proof) -> Self {
        Self {
            file_data: hex::encode(data),
            file_hash,
            proof,
        }
    }

    pub fn decode_data(&self) -> Result<Vec<u8>, hex::FromHexError> {
        hex::decode(&self.file_data)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Intact,
    /// The received bytes do not hash to the advertised leaf digest.
    ContentMismatch { expected: Digest, actual: Digest },
    /// The proof does not lead from the leaf digest to the stored root.
    ProofMismatch { computed: Digest },
}

impl Verdict {
    pub fn is_intact(&self) -> bool {
        matches!(self, Verdict::Intact)
    }
}

pub fn leaf_digest(content: &[u8]) -> Digest {
    hash_bytes(content)
}

/// Root the uploader stores for a batch of files, in upload order.
///
/// `None` for an empty batch.
pub fn batch_root<'a, I>(contents: I) -> Option<Digest>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let tree = MerkleTree::from_leaves(contents.into_iter().map(leaf_digest));
    tree.root_digest().ok().cloned()
}

pub fn check_bundle(data: &[u8], file_hash: &Digest, proof: &Proof, root: &Digest) -> Verdict {
    let actual = leaf_digest(data);
    if &actual != file_hash {
        warn!(expected = %file_hash, actual = %actual, "Content does not match leaf digest");
        return Verdict::ContentMismatch {
            expected: file_hash.clone(),
            actual,
        };
    }

    if verify_proof(file_hash, proof, root) {
        Verdict::Intact
    } else {
        let computed = proof.compute_root(file_hash);
        warn!(computed = %computed, stored = %root, "Proof does not lead to stored root");
        Verdict::ProofMismatch { computed }
    }
}
