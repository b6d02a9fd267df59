//! Discrete weighted sampling.
//!
//! - [`sample_weighted`]: one draw from a fresh weight vector (CDF scan, O(k)). Used per
//!   walk step, where weights change between draws.
//! - [`AliasTable`]: O(1) draws from a fixed distribution (Walker/Vose alias method). Used
//!   for start-node selection, which draws `rho` times from the same degree weights.

use rand::Rng;

/// Draw an index with probability `weights[i] / sum(weights)`.
///
/// Returns `None` when there is nothing to draw from: an empty slice, or a sum that is
/// zero, negative, or not finite. Zero-weight entries are never returned.
///
/// A single positive entry is returned without consuming randomness.
pub fn sample_weighted<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let sum: f64 = weights.iter().copied().sum();
    if !(sum > 0.0) || !sum.is_finite() {
        return None;
    }
    if weights.len() == 1 {
        return Some(0);
    }

    let mut r = rng.random::<f64>() * sum;
    let mut last_positive = None;
    for (i, &w) in weights.iter().enumerate() {
        if w <= 0.0 {
            continue;
        }
        if r < w {
            return Some(i);
        }
        r -= w;
        last_positive = Some(i);
    }
    // Rounding can leave `r` marginally above the final bucket.
    last_positive
}

/// Alias table for repeated O(1) categorical draws.
#[derive(Debug, Clone)]
pub struct AliasTable {
    alias: Vec<usize>,
    prob: Vec<f64>,
}

impl AliasTable {
    /// Build from non-negative relative weights (they need not sum to 1).
    ///
    /// Returns `None` if no weight is positive or the sum is not finite.
    pub fn new(weights: &[f64]) -> Option<Self> {
        let k = weights.len();
        let sum: f64 = weights.iter().map(|&w| w.max(0.0)).sum();
        if !(sum > 0.0) || !sum.is_finite() {
            return None;
        }

        let mut prob = vec![0.0f64; k];
        let mut alias = vec![0usize; k];
        let mut smaller: Vec<usize> = Vec::with_capacity(k);
        let mut larger: Vec<usize> = Vec::with_capacity(k);

        for i in 0..k {
            prob[i] = (k as f64) * weights[i].max(0.0) / sum;
            if prob[i] < 1.0 {
                smaller.push(i);
            } else {
                larger.push(i);
            }
        }

        // A zero-weight slot stranded by rounding must still alias a positive one.
        let fallback = weights.iter().position(|&w| w > 0.0).unwrap_or(0);
        alias.fill(fallback);

        while let (Some(small), Some(large)) = (smaller.pop(), larger.pop()) {
            alias[small] = large;
            prob[large] = prob[large] + prob[small] - 1.0;
            if prob[large] < 1.0 {
                smaller.push(large);
            } else {
                larger.push(large);
            }
        }
        // Leftovers are within rounding of 1.
        for i in larger.into_iter().chain(smaller) {
            if weights[i] > 0.0 {
                prob[i] = 1.0;
            }
        }

        Some(Self { alias, prob })
    }

    pub fn len(&self) -> usize {
        self.prob.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prob.is_empty()
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        let i = rng.random_range(0..self.prob.len());
        if rng.random::<f64>() < self.prob[i] {
            i
        } else {
            self.alias[i]
        }
    }
}
