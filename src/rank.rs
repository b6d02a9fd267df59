//! Ranking utilities.

use crate::weights::{EdgeKey, WeightTable};
use ordered_float::NotNan;
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet};

/// One edge and its centrality, with `u < v`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeScore {
    pub u: usize,
    pub v: usize,
    pub score: f64,
}

impl EdgeScore {
    pub fn new(u: usize, v: usize, score: f64) -> Self {
        let key = EdgeKey::new(u, v);
        Self { u: key.lo(), v: key.hi(), score }
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.u, self.v)
    }
}

/// Highest score first; equal scores by ascending `(u, v)`.
fn by_rank(a: &EdgeScore, b: &EdgeScore) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| (a.u, a.v).cmp(&(b.u, b.v)))
}

/// Edges sorted by descending centrality. The order is fully determined by the scores.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeRanking {
    scores: Vec<EdgeScore>,
}

impl EdgeRanking {
    /// Rank every table entry by `weight / divisor`.
    pub fn from_table(table: &WeightTable, divisor: f64) -> Self {
        let scores = table
            .iter()
            .map(|(key, w)| EdgeScore::new(key.lo(), key.hi(), w / divisor))
            .collect();
        Self::from_scores(scores)
    }

    /// Canonicalises and sorts. Duplicate edges keep their first score.
    pub fn from_scores(scores: Vec<EdgeScore>) -> Self {
        let mut seen = HashSet::with_capacity(scores.len());
        let mut scores: Vec<EdgeScore> = scores
            .into_iter()
            .map(|s| EdgeScore::new(s.u, s.v, s.score))
            .filter(|s| seen.insert(s.key()))
            .collect();
        scores.sort_by(by_rank);
        Self { scores }
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn as_slice(&self) -> &[EdgeScore] {
        &self.scores
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EdgeScore> {
        self.scores.iter()
    }

    pub fn into_vec(self) -> Vec<EdgeScore> {
        self.scores
    }

    /// Score of edge `(u, v)` in either orientation.
    pub fn get(&self, u: usize, v: usize) -> Option<f64> {
        let key = EdgeKey::new(u, v);
        self.scores.iter().find(|s| s.key() == key).map(|s| s.score)
    }

    /// Rescale so the scores sum to 1. A ranking with a non-positive sum is returned as is.
    pub fn normalized(&self) -> Self {
        let sum: f64 = self.scores.iter().map(|s| s.score).sum();
        let mut out = self.clone();
        if sum > 0.0 {
            for s in &mut out.scores {
                s.score /= sum;
            }
        }
        out
    }

    fn positions(&self) -> HashMap<EdgeKey, usize> {
        self.scores.iter().enumerate().map(|(i, s)| (s.key(), i)).collect()
    }
}

impl<'a> IntoIterator for &'a EdgeRanking {
    type Item = &'a EdgeScore;
    type IntoIter = std::slice::Iter<'a, EdgeScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.scores.iter()
    }
}

/// The `k` heaviest entries of a live table, without sorting all of it.
///
/// Non-finite weights are skipped. Ties resolve as in [`EdgeRanking`].
pub fn top_k(table: &WeightTable, k: usize) -> Vec<EdgeScore> {
    if k == 0 || table.is_empty() {
        return Vec::new();
    }
    let mut heap = BinaryHeap::with_capacity(k + 1);
    for (key, w) in table.iter() {
        if !w.is_finite() {
            continue;
        }
        let Ok(s) = NotNan::new(w) else { continue };
        let entry = Reverse((s, Reverse(key)));
        if heap.len() < k {
            heap.push(entry);
        } else if let Some(weakest) = heap.peek() {
            if entry < *weakest {
                heap.pop();
                heap.push(entry);
            }
        }
    }
    let mut results: Vec<EdgeScore> = heap
        .into_iter()
        .map(|Reverse((s, Reverse(key)))| EdgeScore::new(key.lo(), key.hi(), s.into_inner()))
        .collect();
    results.sort_by(by_rank);
    results
}

/// Mean absolute difference of each edge's position in two rankings.
///
/// Taken over the union of edges; an edge missing from one ranking counts as sitting just
/// past its end. Two empty rankings are at distance 0.
pub fn rank_displacement(a: &EdgeRanking, b: &EdgeRanking) -> f64 {
    let pa = a.positions();
    let pb = b.positions();
    let mut keys: Vec<EdgeKey> = pa.keys().chain(pb.keys()).copied().collect();
    keys.sort_unstable();
    keys.dedup();
    if keys.is_empty() {
        return 0.0;
    }
    let total: usize = keys
        .iter()
        .map(|k| {
            let i = pa.get(k).copied().unwrap_or(a.len());
            let j = pb.get(k).copied().unwrap_or(b.len());
            i.abs_diff(j)
        })
        .sum();
    total as f64 / keys.len() as f64
}
