// src/core/merkle/tree.rs
use tracing::debug;

use super::{
    node::{Node, NodeId},
    proof::{self, Proof},
    MerkleError, Result,
};
use crate::core::crypto::Digest;

/// Binary Merkle tree stored in a flat arena.
///
/// The first `leaf_count` arena slots hold the leaves in insertion order;
/// everything after them is derived and thrown away on every rebuild. An odd
/// node at any level is paired with itself.
///
/// Not synchronized. Callers sharing a tree must serialize `add_leaf`
/// against every other access.
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    nodes: Vec<Node>,
    leaf_count: usize,
    root: Option<NodeId>,
}

impl MerkleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_leaves<I>(leaves: I) -> Self
    where
        I: IntoIterator<Item = Digest>,
    {
        let mut tree = Self::new();
        tree.push_leaves(leaves);
        tree.rebuild();
        tree
    }

    /// Appends a leaf and rebuilds the whole tree. Returns the leaf's index.
    ///
    /// Each call costs O(n) in the current leaf count.
    pub fn add_leaf(&mut self, digest: Digest) -> usize {
        let index = self.leaf_count;
        self.push_leaves(std::iter::once(digest));
        self.rebuild();
        index
    }

    /// Appends several leaves with a single rebuild.
    pub fn extend<I>(&mut self, leaves: I)
    where
        I: IntoIterator<Item = Digest>,
    {
        self.push_leaves(leaves);
        self.rebuild();
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    pub fn leaves(&self) -> &[Node] {
        &self.nodes[..self.leaf_count]
    }

    pub fn leaf_digests(&self) -> impl Iterator<Item = &Digest> + '_ {
        self.leaves().iter().map(Node::digest)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.and_then(|id| self.node(id))
    }

    pub fn root_digest(&self) -> Result<&Digest> {
        self.root().map(Node::digest).ok_or(MerkleError::EmptyTree)
    }

    /// Number of levels above the leaves.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut width = self.leaf_count;
        while width > 1 {
            width = (width + 1) / 2;
            height += 1;
        }
        height
    }

    /// Index of the first leaf carrying `digest`.
    pub fn position(&self, digest: &Digest) -> Option<usize> {
        self.leaf_digests().position(|leaf| leaf == digest)
    }

    /// Builds the audit path for the first leaf whose digest is `leaf`.
    pub fn generate_proof(&self, leaf: &Digest) -> Result<Proof> {
        if self.is_empty() {
            return Err(MerkleError::EmptyTree);
        }
        let position = self
            .position(leaf)
            .ok_or_else(|| MerkleError::LeafNotFound(leaf.clone()))?;

        let mut siblings = Vec::with_capacity(self.height());
        let mut current = NodeId(position);
        while let Some(parent_id) = self.nodes[current.0].parent() {
            let Some(sibling) = self.nodes[parent_id.0].sibling_of(current) else {
                break;
            };
            siblings.push(self.nodes[sibling.0].digest().clone());
            current = parent_id;
        }

        debug!(leaf = %leaf, position, steps = siblings.len(), "Generated proof");
        Ok(Proof::new(siblings))
    }

    /// Same as [`proof::verify_proof`]; the tree's own contents are not used.
    pub fn verify_proof(leaf: &Digest, proof: &Proof, claimed_root: &Digest) -> bool {
        proof::verify_proof(leaf, proof, claimed_root)
    }

    fn push_leaves<I>(&mut self, leaves: I)
    where
        I: IntoIterator<Item = Digest>,
    {
        // Drop the derived levels first so leaves stay contiguous.
        self.nodes.truncate(self.leaf_count);
        for digest in leaves {
            self.nodes.push(Node::leaf(digest));
            self.leaf_count += 1;
        }
    }

    fn rebuild(&mut self) {
        self.nodes.truncate(self.leaf_count);
        for leaf in &mut self.nodes {
            leaf.parent = None;
        }
        if self.leaf_count == 0 {
            self.root = None;
            return;
        }

        let mut level: Vec<NodeId> = (0..self.leaf_count).map(NodeId).collect();
        while level.len() > 1 {
            let mut next = Vec::with_capacity((level.len() + 1) / 2);
            for pair in level.chunks(2) {
                let left = pair[0];
                let right = pair.get(1).copied().unwrap_or(left);
                let node = Node::internal(
                    (left, self.nodes[left.0].digest()),
                    (right, self.nodes[right.0].digest()),
                );
                let id = NodeId(self.nodes.len());
                self.nodes.push(node);
                self.nodes[left.0].parent = Some(id);
                self.nodes[right.0].parent = Some(id);
                next.push(id);
            }
            level = next;
        }

        self.root = level.first().copied();
        debug!(
            leaves = self.leaf_count,
            nodes = self.nodes.len(),
            "Merkle tree rebuilt"
        );
    }
}
