//! Half-edge record: one directed half of an undirected edge {u, v}. A
//! half-edge exclusively owns the treap node holding it — in this arena
//! layout the half-edge *is* the node's payload, so the "node" it owns is
//! just its own [`NodeId`] wearing a domain-specific name.

use crate::treap::NodeId;

/// Public identity of a half-edge: a treap node known to hold [`HalfEdge`]
/// payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalfEdgeId(pub(crate) NodeId);

#[derive(Debug, Clone)]
pub struct HalfEdge<V> {
    pub from: V,
    pub to: V,
    pub inverse: HalfEdgeId,
    pub is_forward_edge: bool,
}

impl<V: PartialEq> HalfEdge<V> {
    pub fn new(from: V, to: V, inverse: HalfEdgeId, is_forward_edge: bool) -> Self {
        Self {
            from,
            to,
            inverse,
            is_forward_edge,
        }
    }

    /// Does this half-edge touch `vertex` (as either endpoint)?
    pub fn contains(&self, vertex: &V) -> bool {
        &self.from == vertex || &self.to == vertex
    }
}
