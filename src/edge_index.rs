//! Edge index: maps an ordered pair (u, v) to the half-edge travelling from
//! u to v. Exclusively owns the half-edges it stores — dropping the index
//! drops them.
//!
//! Half-edges are directed, so `forward` and `backward` are genuinely
//! different maps rather than one map probed in both orders: `link(u, v)`
//! writes the forward half-edge under `(u, v)` and the backward half-edge
//! under `(v, u)`. A caller asking about the undirected edge {u, v} without
//! knowing which one is forward has to probe both combinations, which is
//! what [`EdgeIndex::get_pair`] does.

use std::collections::HashMap;
use std::hash::Hash;

use crate::half_edge::HalfEdgeId;

#[derive(Debug)]
pub struct EdgeIndex<V> {
    forward: HashMap<V, HashMap<V, HalfEdgeId>>,
    backward: HashMap<V, HashMap<V, HalfEdgeId>>,
}

impl<V> Default for EdgeIndex<V> {
    fn default() -> Self {
        Self {
            forward: HashMap::new(),
            backward: HashMap::new(),
        }
    }
}

impl<V> EdgeIndex<V>
where
    V: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_forward(&mut self, u: V, v: V, e: HalfEdgeId) {
        let prev = self.forward.entry(u).or_default().insert(v, e);
        debug_assert!(prev.is_none(), "forward edge already present");
    }

    pub fn insert_backward(&mut self, u: V, v: V, e: HalfEdgeId) {
        let prev = self.backward.entry(u).or_default().insert(v, e);
        debug_assert!(prev.is_none(), "backward edge already present");
    }

    fn get_forward(&self, u: &V, v: &V) -> Option<HalfEdgeId> {
        self.forward.get(u).and_then(|m| m.get(v)).copied()
    }

    fn get_backward(&self, u: &V, v: &V) -> Option<HalfEdgeId> {
        self.backward.get(u).and_then(|m| m.get(v)).copied()
    }

    /// Looks up the forward/backward half-edge pair for the undirected edge
    /// {u, v}, trying both orderings the caller might supply.
    pub fn get_pair(&self, u: &V, v: &V) -> Option<(HalfEdgeId, HalfEdgeId)> {
        if let (Some(f), Some(b)) = (self.get_forward(u, v), self.get_backward(v, u)) {
            return Some((f, b));
        }
        if let (Some(f), Some(b)) = (self.get_forward(v, u), self.get_backward(u, v)) {
            return Some((f, b));
        }
        None
    }

    /// Removes and returns the forward/backward pair for {u, v}, trying both
    /// orderings. Panics if the edge is not present.
    pub fn remove_pair(&mut self, u: &V, v: &V) -> (HalfEdgeId, HalfEdgeId) {
        if self.get_forward(u, v).is_some() {
            let f = self.forward.get_mut(u).unwrap().remove(v).unwrap();
            let b = self.backward.get_mut(v).unwrap().remove(u).unwrap();
            return (f, b);
        }
        let f = self
            .forward
            .get_mut(v)
            .and_then(|m| m.remove(u))
            .expect("remove_pair called on an absent edge");
        let b = self
            .backward
            .get_mut(u)
            .and_then(|m| m.remove(v))
            .expect("remove_pair called on an absent edge");
        (f, b)
    }
}
