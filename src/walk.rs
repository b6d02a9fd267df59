//! Length-bounded simple-path walks.
//!
//! A walk starts at one node and repeatedly steps to an unvisited neighbor until it holds
//! `kappa` nodes or gets stuck. Every traversed edge gains `beta` in the [`WeightTable`].
//!
//! Tracing a path and crediting it are separate steps. An edge already traversed joins two
//! visited nodes and is never a candidate again within the same walk, so crediting after
//! the walk sees the same selection weights as crediting step by step.

use crate::graph::Graph;
use crate::sample::sample_weighted;
use crate::weights::WeightTable;
use crate::{Error, Result};
use rand::Rng;

/// How a walk picks each next node (and, in a run, its start node).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Policy {
    /// Uniform start node, uniform choice among unvisited neighbors.
    Uniform,
    /// Degree-weighted start node, choice proportional to accrued edge weight.
    #[default]
    EdgeWeighted,
}

/// Why a walk stopped. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The path reached `kappa` nodes.
    MaxLength,
    /// Every neighbor of the last node was already on the path.
    DeadEnd,
    /// The unvisited neighbors' edge weights summed to zero.
    ZeroWeight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkOutcome {
    /// Visited nodes in order; always starts with the start node, never repeats one.
    pub path: Vec<usize>,
    pub termination: Termination,
}

impl WalkOutcome {
    /// Number of edges traversed.
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// True if the walk stopped before reaching `kappa` nodes.
    pub fn terminated_early(&self) -> bool {
        self.termination != Termination::MaxLength
    }
}

/// Buffers reused across walks.
///
/// `visited` uses a stamp per walk instead of clearing: a node is on the current path iff
/// `visited[node] == stamp`.
#[derive(Debug, Clone, Default)]
pub struct WalkScratch {
    visited: Vec<u32>,
    stamp: u32,
    candidates: Vec<usize>,
    weights: Vec<f64>,
}

impl WalkScratch {
    pub fn new(node_count: usize) -> Self {
        Self {
            visited: vec![0; node_count],
            ..Self::default()
        }
    }

    fn begin(&mut self, node_count: usize) {
        if self.visited.len() < node_count {
            self.visited.resize(node_count, 0);
        }
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.visited.fill(0);
            self.stamp = 1;
        }
    }

    fn visit(&mut self, node: usize) {
        self.visited[node] = self.stamp;
    }

    fn is_visited(&self, node: usize) -> bool {
        self.visited[node] == self.stamp
    }
}

/// Run one walk from `start` and add `beta` to every edge it traverses.
///
/// Fails on `kappa == 0` or an out-of-range start node; the table is untouched then.
pub fn propagate<G: Graph, R: Rng>(
    graph: &G,
    start: usize,
    kappa: usize,
    beta: f64,
    policy: Policy,
    table: &mut WeightTable,
    scratch: &mut WalkScratch,
    rng: &mut R,
) -> Result<WalkOutcome> {
    let outcome = trace(graph, start, kappa, policy, table, scratch, rng)?;
    credit(table, &outcome.path, beta);
    Ok(outcome)
}

/// Add `beta` to each consecutive edge of `path`.
pub(crate) fn credit(table: &mut WeightTable, path: &[usize], beta: f64) {
    for step in path.windows(2) {
        table.add(step[0], step[1], beta);
    }
}

/// Choose a simple path from `start` without modifying `table`.
pub(crate) fn trace<G: Graph, R: Rng>(
    graph: &G,
    start: usize,
    kappa: usize,
    policy: Policy,
    table: &WeightTable,
    scratch: &mut WalkScratch,
    rng: &mut R,
) -> Result<WalkOutcome> {
    if kappa == 0 {
        return Err(Error::InvalidConfiguration("kappa must be at least 1".to_string()));
    }
    let n = graph.node_count();
    if start >= n {
        return Err(Error::InvalidConfiguration(format!(
            "start node {start} out of range for {n} nodes"
        )));
    }

    scratch.begin(n);
    scratch.visit(start);
    let mut path = Vec::with_capacity(kappa.min(n));
    path.push(start);
    let mut curr = start;

    for _ in 1..kappa {
        scratch.candidates.clear();
        for &v in graph.neighbor_slice(curr).iter() {
            if v < n && !scratch.is_visited(v) {
                scratch.candidates.push(v);
            }
        }
        if scratch.candidates.is_empty() {
            return Ok(WalkOutcome { path, termination: Termination::DeadEnd });
        }

        let next = match policy {
            Policy::Uniform => scratch.candidates[rng.random_range(0..scratch.candidates.len())],
            Policy::EdgeWeighted => {
                scratch.weights.clear();
                scratch
                    .weights
                    .extend(scratch.candidates.iter().map(|&v| table.get(curr, v).unwrap_or(0.0)));
                match sample_weighted(rng, &scratch.weights) {
                    Some(i) => scratch.candidates[i],
                    None => {
                        tracing::warn!(
                            node = curr,
                            candidates = scratch.candidates.len(),
                            "zero total edge weight among unvisited neighbors; stopping walk"
                        );
                        return Ok(WalkOutcome { path, termination: Termination::ZeroWeight });
                    }
                }
            }
        };

        scratch.visit(next);
        path.push(next);
        curr = next;
    }

    Ok(WalkOutcome { path, termination: Termination::MaxLength })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyList;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::borrow::Cow;

    /// Path 0 - 1 - 2 that only hands out borrowed neighbor slices.
    struct SliceOnly {
        adj: Vec<Vec<usize>>,
    }

    impl Graph for SliceOnly {
        fn node_count(&self) -> usize {
            self.adj.len()
        }

        fn neighbors(&self, _node: usize) -> Vec<usize> {
            panic!("walks must not copy neighbor lists");
        }

        fn neighbor_slice(&self, node: usize) -> Cow<'_, [usize]> {
            Cow::Borrowed(self.adj[node].as_slice())
        }
    }

    fn table_for(g: &AdjacencyList, w: f64) -> WeightTable {
        WeightTable::uniform(g, w).unwrap()
    }

    #[test]
    fn kappa_zero_fails_fast() {
        let g = AdjacencyList::from_edges(2, &[(0, 1)]);
        let mut t = table_for(&g, 1.0);
        let mut s = WalkScratch::new(2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = propagate(&g, 0, 0, 1.0, Policy::Uniform, &mut t, &mut s, &mut rng);
        assert!(matches!(err, Err(Error::InvalidConfiguration(_))));
        assert_eq!(t.get(0, 1), Some(1.0));
    }

    #[test]
    fn kappa_one_takes_no_steps() {
        let g = AdjacencyList::from_edges(2, &[(0, 1)]);
        let mut t = table_for(&g, 1.0);
        let mut s = WalkScratch::new(2);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = propagate(&g, 1, 1, 1.0, Policy::EdgeWeighted, &mut t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![1]);
        assert_eq!(out.termination, Termination::MaxLength);
        assert_eq!(t.get(0, 1), Some(1.0));
    }

    #[test]
    fn path_graph_walk_runs_to_the_end() {
        // 0 - 1 - 2 - 3: from 0 there is exactly one simple path.
        let g = AdjacencyList::from_edges(4, &[(0, 1), (1, 2), (2, 3)]);
        let mut t = table_for(&g, 0.0);
        let mut s = WalkScratch::new(4);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let out = propagate(&g, 0, 10, 0.5, Policy::Uniform, &mut t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![0, 1, 2, 3]);
        assert_eq!(out.termination, Termination::DeadEnd);
        assert!(out.terminated_early());
        assert_eq!(out.steps(), 3);
        for (u, v) in [(0, 1), (1, 2), (2, 3)] {
            assert_eq!(t.get(u, v), Some(0.5));
        }

        let out = propagate(&g, 0, 3, 0.5, Policy::Uniform, &mut t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![0, 1, 2]);
        assert_eq!(out.termination, Termination::MaxLength);
        assert_eq!(t.get(2, 3), Some(0.5));
        assert_eq!(t.get(1, 2), Some(1.0));
    }

    #[test]
    fn triangle_walk_never_revisits() {
        let g = AdjacencyList::from_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let mut t = table_for(&g, 1.0);
        let mut s = WalkScratch::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for start in 0..3 {
            for policy in [Policy::Uniform, Policy::EdgeWeighted] {
                let out = propagate(&g, start, 10, 1.0, policy, &mut t, &mut s, &mut rng).unwrap();
                assert_eq!(out.path.len(), 3);
                let mut sorted = out.path.clone();
                sorted.sort_unstable();
                assert_eq!(sorted, vec![0, 1, 2]);
                assert_eq!(out.termination, Termination::DeadEnd);
            }
        }
    }

    #[test]
    fn zero_weights_stop_edge_weighted_walks_only() {
        let g = AdjacencyList::from_edges(3, &[(0, 1), (1, 2)]);
        let t = table_for(&g, 0.0);
        let mut s = WalkScratch::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let out = trace(&g, 0, 3, Policy::EdgeWeighted, &t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![0]);
        assert_eq!(out.termination, Termination::ZeroWeight);

        let out = trace(&g, 0, 3, Policy::Uniform, &t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![0, 1, 2]);
    }

    #[test]
    fn edge_weighted_step_follows_heavy_edge() {
        // Hub 0 with leaves 1 and 2; edge (0, 1) carries all the weight.
        let g = AdjacencyList::from_edges(3, &[(0, 1), (0, 2)]);
        let mut t = WeightTable::new();
        t.insert(0, 1, 5.0);
        t.insert(0, 2, 0.0);
        let mut s = WalkScratch::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        for _ in 0..200 {
            let out = trace(&g, 0, 2, Policy::EdgeWeighted, &t, &mut s, &mut rng).unwrap();
            assert_eq!(out.path, vec![0, 1]);
        }
    }

    #[test]
    fn steps_borrow_neighbor_slices() {
        let g = SliceOnly { adj: vec![vec![1], vec![0, 2], vec![1]] };
        let mut t = WeightTable::new();
        t.insert(0, 1, 1.0);
        t.insert(1, 2, 1.0);
        let mut s = WalkScratch::new(3);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for policy in [Policy::Uniform, Policy::EdgeWeighted] {
            let out = propagate(&g, 0, 5, 1.0, policy, &mut t, &mut s, &mut rng).unwrap();
            assert_eq!(out.path, vec![0, 1, 2]);
        }
        assert_eq!(t.get(1, 2), Some(3.0));
    }

    #[test]
    fn out_of_range_start_is_rejected() {
        let g = AdjacencyList::from_edges(2, &[(0, 1)]);
        let t = table_for(&g, 1.0);
        let mut s = WalkScratch::default();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(trace(&g, 5, 3, Policy::Uniform, &t, &mut s, &mut rng).is_err());
    }

    #[test]
    fn stamp_wraparound_resets_visited() {
        let g = AdjacencyList::from_edges(3, &[(0, 1), (1, 2)]);
        let t = table_for(&g, 1.0);
        let mut s = WalkScratch::new(3);
        s.stamp = u32::MAX;
        s.visited = vec![u32::MAX; 3];
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let out = trace(&g, 0, 3, Policy::Uniform, &t, &mut s, &mut rng).unwrap();
        assert_eq!(out.path, vec![0, 1, 2]);
    }
}
