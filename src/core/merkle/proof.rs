// src/core/merkle/proof.rs
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::crypto::{combine, Digest};

/// Audit path: sibling digests from a leaf up to (not including) the root.
///
/// Serializes as a bare JSON array of hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof(Vec<Digest>);

impl Proof {
    pub fn new(siblings: Vec<Digest>) -> Self {
        Self(siblings)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn siblings(&self) -> &[Digest] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Digest> {
        self.0
    }

    /// Root digest this proof produces when started from `leaf`.
    pub fn compute_root(&self, leaf: &Digest) -> Digest {
        self.0.iter().fold(leaf.clone(), |current, sibling| {
            let next = combine(&current, sibling);
            debug!(step = %next, "Combined proof element");
            next
        })
    }

    pub fn verify(&self, leaf: &Digest, claimed_root: &Digest) -> bool {
        verify_proof(leaf, self, claimed_root)
    }
}

impl From<Vec<Digest>> for Proof {
    fn from(siblings: Vec<Digest>) -> Self {
        Self(siblings)
    }
}

/// Checks that `proof` leads from `leaf` to `claimed_root`.
///
/// Needs no tree and touches no shared state. With an empty proof this is
/// true only when the leaf is itself the root.
pub fn verify_proof(leaf: &Digest, proof: &Proof, claimed_root: &Digest) -> bool {
    &proof.compute_root(leaf) == claimed_root
}
