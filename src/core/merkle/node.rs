// src/core/merkle/node.rs
use crate::core::crypto::{combine, Digest};

/// Index of a node inside a [`MerkleTree`](super::MerkleTree) arena.
///
/// Only meaningful for the tree generation that produced it: a rebuild
/// discards every internal node, so ids above the leaf range go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    digest: Digest,
    children: Option<(NodeId, NodeId)>,
    pub(crate) parent: Option<NodeId>,
}

impl Node {
    pub(crate) fn leaf(digest: Digest) -> Self {
        Self {
            digest,
            children: None,
            parent: None,
        }
    }

    /// Both ids may be the same node when an odd level pairs its last node
    /// with itself.
    pub(crate) fn internal(left: (NodeId, &Digest), right: (NodeId, &Digest)) -> Self {
        Self {
            digest: combine(left.1, right.1),
            children: Some((left.0, right.0)),
            parent: None,
        }
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The other child of this node, given one of them.
    pub(crate) fn sibling_of(&self, child: NodeId) -> Option<NodeId> {
        self.children
            .map(|(left, right)| if left == child { right } else { left })
    }
}
