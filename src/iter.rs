//! Iterators over a component. Both borrow the [`Tour`] immutably, so the
//! borrow checker — rather than a runtime generation check — is what makes
//! them "invalidated by mutation": a live iterator keeps `&Tour` borrowed,
//! so no `&mut self` method on the same tour can run until it is dropped.

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::half_edge::HalfEdgeId;
use crate::tour::Tour;
use crate::treap::NodeId;

/// Yields every vertex in a component exactly once.
///
/// The per-vertex anchors only promise to be the min/max *occurrence* of a
/// vertex in tour order, not that the stored sequence is a literally
/// continuous directed walk — a singleton-neighbor reroot can leave it
/// slightly skewed. So rather than trust a bare `from`-field walk to hit
/// each vertex exactly once, this iterator walks every node once and tracks
/// a seen-set, yielding a vertex the first time either its `from` or `to`
/// shows up. Still a single forward pass over the component, still O(k).
pub struct VertexIter<'a, V> {
    tour: &'a Tour<V>,
    cursor: Option<NodeId>,
    seen: HashSet<V>,
    singleton: Option<V>,
    done: bool,
}

impl<'a, V> VertexIter<'a, V>
where
    V: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(tour: &'a Tour<V>, v: &V) -> Self {
        let rec = tour.vertex(v);
        if rec.is_singleton() {
            Self {
                tour,
                cursor: None,
                seen: HashSet::new(),
                singleton: Some(v.clone()),
                done: false,
            }
        } else {
            let root = tour.treap.find_min(rec.left_out().unwrap().0);
            Self {
                tour,
                cursor: Some(root),
                seen: HashSet::new(),
                singleton: None,
                done: false,
            }
        }
    }
}

impl<'a, V> Iterator for VertexIter<'a, V>
where
    V: Clone + Eq + Hash,
{
    type Item = V;

    fn next(&mut self) -> Option<V> {
        if let Some(v) = self.singleton.take() {
            self.done = true;
            return Some(v);
        }
        if self.done {
            return None;
        }
        while let Some(node) = self.cursor {
            self.cursor = self.tour.treap.next(node);
            let he = self.tour.treap.get(node);
            for candidate in [&he.from, &he.to] {
                if self.seen.insert(candidate.clone()) {
                    return Some(candidate.clone());
                }
            }
        }
        self.done = true;
        None
    }
}

/// Yields every half-edge in a component in tour order (each undirected edge
/// appears twice: once forward, once backward).
pub struct EdgeIter<'a, V> {
    tour: &'a Tour<V>,
    cursor: Option<NodeId>,
}

impl<'a, V> EdgeIter<'a, V>
where
    V: Clone + Eq + Hash + Debug,
{
    pub(crate) fn new(tour: &'a Tour<V>, v: &V) -> Self {
        let rec = tour.vertex(v);
        let cursor = rec
            .left_out()
            .map(|anchor| tour.treap.find_min(anchor.0));
        Self { tour, cursor }
    }
}

impl<'a, V> Iterator for EdgeIter<'a, V> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<HalfEdgeId> {
        let node = self.cursor?;
        self.cursor = self.tour.treap.next(node);
        Some(HalfEdgeId(node))
    }
}
