//! Minimal undirected graph adapter.
//!
//! Walks only need neighbor lookup and counts, so the trait stays small.
//!
//! Contract: node ids are `0..node_count()`, [`Graph::nodes`] lists only ids in that range,
//! and every edge is visible from both endpoints. Runs check the first two and fail with
//! [`Error::DegenerateGraph`](crate::Error::DegenerateGraph) when they do not hold.

use crate::weights::EdgeKey;
use crate::{Error, Result};
use std::borrow::Cow;

pub trait Graph {
    fn node_count(&self) -> usize;
    fn neighbors(&self, node: usize) -> Vec<usize>;

    /// Neighbors of `node`, borrowed when the graph stores them contiguously.
    ///
    /// Walks call this once per step; override it to avoid the copy in [`Graph::neighbors`].
    fn neighbor_slice(&self, node: usize) -> Cow<'_, [usize]> {
        Cow::Owned(self.neighbors(node))
    }

    fn degree(&self, node: usize) -> usize {
        self.neighbor_slice(node).len()
    }

    /// Node ids in a stable order. The default is `0..node_count()`.
    fn nodes(&self) -> Vec<usize> {
        (0..self.node_count()).collect()
    }

    /// Each undirected edge once, as a canonical key. Self-loops are skipped.
    fn edges(&self) -> Vec<EdgeKey> {
        let mut out = Vec::new();
        for u in self.nodes() {
            for &v in self.neighbor_slice(u).iter() {
                if u < v {
                    out.push(EdgeKey::new(u, v));
                }
            }
        }
        out
    }

    fn edge_count(&self) -> usize {
        self.edges().len()
    }
}

/// Sorted, deduplicated, symmetric adjacency lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    adj: Vec<Vec<usize>>,
    edges: usize,
}

impl AdjacencyList {
    /// Build from an undirected edge list on `n` nodes.
    ///
    /// Either orientation of an edge may be given, duplicates are merged and self-loops
    /// dropped. Nodes referenced beyond `n` grow the graph.
    ///
    /// # Panics
    ///
    /// If the ids need more nodes than can be allocated. Use
    /// [`AdjacencyList::try_from_edges`] for untrusted input.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> Self {
        match Self::try_from_edges(n, edges) {
            Ok(g) => g,
            Err(e) => panic!("{e}"),
        }
    }

    /// Like [`AdjacencyList::from_edges`], but fails with [`Error::TooLarge`] instead of
    /// overflowing on `usize::MAX` or aborting on an impossible allocation.
    pub fn try_from_edges(n: usize, edges: &[(usize, usize)]) -> Result<Self> {
        let mut nodes = n;
        for &(u, v) in edges {
            let needed = u
                .max(v)
                .checked_add(1)
                .ok_or_else(|| Error::TooLarge(format!("node id {} has no successor", u.max(v))))?;
            nodes = nodes.max(needed);
        }
        let mut adj: Vec<Vec<usize>> = Vec::new();
        adj.try_reserve_exact(nodes)
            .map_err(|e| Error::TooLarge(format!("cannot allocate {nodes} nodes: {e}")))?;
        adj.resize_with(nodes, Vec::new);

        for &(u, v) in edges {
            if u == v {
                continue;
            }
            adj[u].push(v);
            adj[v].push(u);
        }
        let mut half_edges = 0usize;
        for nbrs in &mut adj {
            nbrs.sort_unstable();
            nbrs.dedup();
            half_edges += nbrs.len();
        }
        Ok(Self { adj, edges: half_edges / 2 })
    }

    pub fn neighbors_ref(&self, node: usize) -> &[usize] {
        self.adj.get(node).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Graph for AdjacencyList {
    fn node_count(&self) -> usize {
        self.adj.len()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        self.neighbors_ref(node).to_vec()
    }

    fn neighbor_slice(&self, node: usize) -> Cow<'_, [usize]> {
        Cow::Borrowed(self.neighbors_ref(node))
    }

    fn degree(&self, node: usize) -> usize {
        self.neighbors_ref(node).len()
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}

#[cfg(feature = "petgraph")]
impl<N, E, Ix> Graph for petgraph::Graph<N, E, petgraph::Undirected, Ix>
where
    Ix: petgraph::graph::IndexType,
{
    fn node_count(&self) -> usize {
        self.node_count()
    }

    fn neighbors(&self, node: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self
            .neighbors(petgraph::graph::NodeIndex::new(node))
            .map(|idx| idx.index())
            .filter(|&v| v != node)
            .collect();
        // Parallel edges show up once per edge.
        out.sort_unstable();
        out.dedup();
        out
    }
}
