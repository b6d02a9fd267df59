//! Edge weight table and degree weights.

use crate::graph::Graph;
use crate::{Error, Result};
use std::collections::HashMap;

/// Canonical key of an undirected edge: `lo <= hi` regardless of the orientation given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeKey {
    lo: usize,
    hi: usize,
}

impl EdgeKey {
    pub fn new(u: usize, v: usize) -> Self {
        if u <= v {
            Self { lo: u, hi: v }
        } else {
            Self { lo: v, hi: u }
        }
    }

    pub fn lo(self) -> usize {
        self.lo
    }

    pub fn hi(self) -> usize {
        self.hi
    }

    pub fn endpoints(self) -> (usize, usize) {
        (self.lo, self.hi)
    }
}

impl From<(usize, usize)> for EdgeKey {
    fn from((u, v): (usize, usize)) -> Self {
        Self::new(u, v)
    }
}

/// Accrued weight per canonical edge, shared by every walk of a run.
///
/// Weights only grow: the sole mutator after initialisation is [`WeightTable::add`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightTable {
    weights: HashMap<EdgeKey, f64>,
}

impl WeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per graph edge, all set to `initial`.
    ///
    /// Fails on a graph with no nodes or no edges.
    pub fn uniform<G: Graph>(graph: &G, initial: f64) -> Result<Self> {
        let n = graph.node_count();
        let m = graph.edge_count();
        if n == 0 || m == 0 {
            return Err(Error::DegenerateGraph { nodes: n, edges: m });
        }
        let mut table = Self { weights: HashMap::with_capacity(m) };
        for key in graph.edges() {
            table.insert(key.lo(), key.hi(), initial);
        }
        Ok(table)
    }

    /// Insert an edge if absent. Both orientations map to the same entry; the first
    /// insertion wins.
    pub fn insert(&mut self, u: usize, v: usize, weight: f64) {
        self.weights.entry(EdgeKey::new(u, v)).or_insert(weight);
    }

    pub fn get(&self, u: usize, v: usize) -> Option<f64> {
        self.weights.get(&EdgeKey::new(u, v)).copied()
    }

    /// Add `delta` to the edge's weight, creating it at `delta` if absent.
    pub fn add(&mut self, u: usize, v: usize, delta: f64) {
        *self.weights.entry(EdgeKey::new(u, v)).or_insert(0.0) += delta;
    }

    /// Additively fold `(edge, delta)` pairs in, in the given order.
    pub fn merge<I: IntoIterator<Item = (EdgeKey, f64)>>(&mut self, deltas: I) {
        for (key, delta) in deltas {
            self.add(key.lo(), key.hi(), delta);
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, f64)> + '_ {
        self.weights.iter().map(|(&k, &w)| (k, w))
    }
}

/// `degree(node) / m` for every node, indexed by node id.
///
/// These are relative weights for the start-node draw, not a distribution: by the
/// handshake lemma they sum to 2.
///
/// Fails with [`Error::DegenerateGraph`] if [`Graph::nodes`] yields an id outside
/// `0..node_count()`.
pub fn degree_weights<G: Graph>(graph: &G) -> Result<Vec<f64>> {
    let n = graph.node_count();
    let m = graph.edge_count();
    if n == 0 || m == 0 {
        return Err(Error::DegenerateGraph { nodes: n, edges: m });
    }
    let m = m as f64;
    let mut out = vec![0.0; n];
    for node in graph.nodes() {
        let slot = out.get_mut(node).ok_or(Error::DegenerateGraph {
            nodes: n,
            edges: graph.edge_count(),
        })?;
        *slot = graph.degree(node) as f64 / m;
    }
    Ok(out)
}
