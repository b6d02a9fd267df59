//! Walk-based edge centrality.
//!
//! A run initialises the [`WeightTable`], performs `rho` walks one after another, then
//! turns the table into an [`EdgeRanking`]:
//!
//! ```text
//! Initialized --step()--> Sampling --finish()--> EdgeRanking (terminal, read-only)
//! ```
//!
//! Order matters for [`Policy::EdgeWeighted`]: each walk's step distribution depends on
//! the weights left by all earlier walks, so the sequential runner never reorders walks.
//!
//! Weighting variants:
//! - [`Weighting::Continuous`]: every edge starts at `1/m`; the result is the raw table.
//! - [`Weighting::Count`]: every edge starts at `1`; the result is the table divided by
//!   `rho` (a per-walk rate).

use crate::graph::Graph;
use crate::rank::EdgeRanking;
use crate::sample::AliasTable;
use crate::walk::{self, Policy, Termination, WalkOutcome, WalkScratch};
use crate::weights::{degree_weights, WeightTable};
use crate::{Error, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Weighting {
    /// Start at `1/m`, default increment `1/m`, no final division.
    Continuous,
    /// Start at `1`, default increment `1`, divide by `rho` at the end.
    #[default]
    Count,
}

impl Weighting {
    pub fn initial_weight(self, edge_count: usize) -> f64 {
        match self {
            Weighting::Continuous => 1.0 / edge_count as f64,
            Weighting::Count => 1.0,
        }
    }

    pub fn default_beta(self, edge_count: usize) -> f64 {
        self.initial_weight(edge_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityConfig {
    /// Maximum nodes per walk (`>= 1`).
    pub kappa: usize,
    /// Number of walks. `None` means one walk per edge.
    pub rho: Option<usize>,
    /// Weight added per traversed edge. `None` means [`Weighting::default_beta`].
    pub beta: Option<f64>,
    pub policy: Policy,
    pub weighting: Weighting,
    pub seed: u64,
}

impl Default for CentralityConfig {
    fn default() -> Self {
        Self {
            kappa: 20,
            rho: None,
            beta: None,
            policy: Policy::EdgeWeighted,
            weighting: Weighting::Count,
            seed: 42,
        }
    }
}

impl CentralityConfig {
    /// Checks that do not need the graph.
    pub fn validate(&self) -> Result<()> {
        if self.kappa == 0 {
            return Err(Error::InvalidConfiguration("kappa must be at least 1".to_string()));
        }
        if let Some(beta) = self.beta {
            if !beta.is_finite() || beta < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "beta must be finite and non-negative, got {beta}"
                )));
            }
        }
        if self.rho == Some(0) && self.weighting == Weighting::Count {
            return Err(Error::InvalidConfiguration(
                "rho must be positive for count weighting".to_string(),
            ));
        }
        Ok(())
    }
}

/// Counters gathered while sampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub walks: usize,
    /// Edges traversed over all walks.
    pub steps: usize,
    pub full_length: usize,
    pub dead_ends: usize,
    pub zero_weight: usize,
}

impl RunStats {
    fn record(&mut self, outcome: &WalkOutcome) {
        self.walks += 1;
        self.steps += outcome.steps();
        match outcome.termination {
            Termination::MaxLength => self.full_length += 1,
            Termination::DeadEnd => self.dead_ends += 1,
            Termination::ZeroWeight => self.zero_weight += 1,
        }
    }

    pub fn early_terminations(&self) -> usize {
        self.dead_ends + self.zero_weight
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Tables built, no walk taken yet.
    Initialized,
    /// At least one walk taken.
    Sampling,
}

#[derive(Debug, Clone)]
enum StartNodes {
    Uniform(Vec<usize>),
    Degree(AliasTable),
}

impl StartNodes {
    fn draw<R: Rng>(&self, rng: &mut R) -> usize {
        match self {
            StartNodes::Uniform(nodes) => nodes[rng.random_range(0..nodes.len())],
            StartNodes::Degree(table) => table.draw(rng),
        }
    }
}

/// One centrality run over a borrowed graph.
#[derive(Debug)]
pub struct CentralityRun<'g, G: Graph> {
    graph: &'g G,
    kappa: usize,
    rho: usize,
    beta: f64,
    policy: Policy,
    weighting: Weighting,
    seed: u64,
    table: WeightTable,
    starts: StartNodes,
    scratch: WalkScratch,
    rng: ChaCha8Rng,
    stats: RunStats,
}

impl<'g, G: Graph> CentralityRun<'g, G> {
    /// Validate `config` against `graph` and build both weight tables.
    pub fn new(graph: &'g G, config: CentralityConfig) -> Result<Self> {
        config.validate()?;
        let n = graph.node_count();
        let m = graph.edge_count();
        if n == 0 || m == 0 {
            return Err(Error::DegenerateGraph { nodes: n, edges: m });
        }

        let rho = config.rho.unwrap_or(m);
        let beta = config.beta.unwrap_or_else(|| config.weighting.default_beta(m));
        let table = WeightTable::uniform(graph, config.weighting.initial_weight(m))?;
        let starts = match config.policy {
            Policy::Uniform => {
                let nodes = graph.nodes();
                if nodes.is_empty() || nodes.iter().any(|&v| v >= n) {
                    return Err(Error::DegenerateGraph { nodes: n, edges: m });
                }
                StartNodes::Uniform(nodes)
            }
            Policy::EdgeWeighted => {
                let degrees = degree_weights(graph)?;
                let alias = AliasTable::new(&degrees)
                    .ok_or(Error::DegenerateGraph { nodes: n, edges: m })?;
                StartNodes::Degree(alias)
            }
        };

        tracing::debug!(
            nodes = n,
            edges = m,
            kappa = config.kappa,
            rho,
            beta,
            policy = ?config.policy,
            weighting = ?config.weighting,
            "edge centrality run initialised"
        );

        Ok(Self {
            graph,
            kappa: config.kappa,
            rho,
            beta,
            policy: config.policy,
            weighting: config.weighting,
            seed: config.seed,
            table,
            starts,
            scratch: WalkScratch::new(n),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            stats: RunStats::default(),
        })
    }

    pub fn phase(&self) -> Phase {
        if self.stats.walks == 0 {
            Phase::Initialized
        } else {
            Phase::Sampling
        }
    }

    pub fn rho(&self) -> usize {
        self.rho
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn remaining(&self) -> usize {
        self.rho - self.stats.walks
    }

    /// The live table. Entries are never removed and only grow.
    pub fn weights(&self) -> &WeightTable {
        &self.table
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Perform the next walk. Returns `None` once all `rho` walks are done.
    pub fn step(&mut self) -> Result<Option<WalkOutcome>> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        let start = self.starts.draw(&mut self.rng);
        let outcome = walk::propagate(
            self.graph,
            start,
            self.kappa,
            self.beta,
            self.policy,
            &mut self.table,
            &mut self.scratch,
            &mut self.rng,
        )?;
        self.stats.record(&outcome);
        tracing::trace!(
            walk = self.stats.walks,
            start,
            len = outcome.path.len(),
            termination = ?outcome.termination,
            "walk done"
        );
        Ok(Some(outcome))
    }

    /// Perform the remaining walks and rank the edges.
    pub fn finish(mut self) -> Result<EdgeRanking> {
        while self.step()?.is_some() {}
        Ok(self.aggregate())
    }

    fn aggregate(self) -> EdgeRanking {
        tracing::debug!(
            walks = self.stats.walks,
            steps = self.stats.steps,
            full_length = self.stats.full_length,
            dead_ends = self.stats.dead_ends,
            zero_weight = self.stats.zero_weight,
            "edge centrality sampling complete"
        );
        let divisor = match self.weighting {
            Weighting::Continuous => 1.0,
            Weighting::Count => self.rho as f64,
        };
        EdgeRanking::from_table(&self.table, divisor)
    }
}

/// Estimate edge centrality: `rho` sequential walks, then rank edges by accrued weight.
///
/// The result holds every edge of `graph` exactly once, heaviest first, ties broken by
/// ascending `(u, v)`.
pub fn edge_centrality<G: Graph>(graph: &G, config: CentralityConfig) -> Result<EdgeRanking> {
    CentralityRun::new(graph, config)?.finish()
}

/// Parallel variant of [`edge_centrality`].
///
/// Walks run in batches of `batch_size`. Within a batch every walk traces against the
/// table as it stood at the batch start; the batch's increments are then merged in walk
/// order. Walk `i` draws from its own RNG stream derived from `(seed, i)`, so the output
/// depends on `batch_size` but not on the Rayon thread count.
///
/// With `batch_size == 1` the edge-weighted feedback is the same as the sequential runner,
/// though the random streams differ.
#[cfg(feature = "parallel")]
pub fn edge_centrality_parallel<G: Graph + Sync>(
    graph: &G,
    config: CentralityConfig,
    batch_size: usize,
) -> Result<EdgeRanking> {
    use rayon::prelude::*;

    if batch_size == 0 {
        return Err(Error::InvalidConfiguration("batch_size must be positive".to_string()));
    }

    let mut run = CentralityRun::new(graph, config)?;
    let n = graph.node_count();
    let mut batch_start = 0usize;

    while batch_start < run.rho {
        let batch_end = (batch_start + batch_size).min(run.rho);
        let snapshot = &run.table;
        let starts = &run.starts;
        let (kappa, policy, seed) = (run.kappa, run.policy, run.seed);

        let outcomes: Vec<WalkOutcome> = (batch_start..batch_end)
            .into_par_iter()
            .map_init(
                || WalkScratch::new(n),
                |scratch, i| {
                    let mut rng = ChaCha8Rng::seed_from_u64(mix64(seed ^ (i as u64)));
                    let start = starts.draw(&mut rng);
                    walk::trace(graph, start, kappa, policy, snapshot, scratch, &mut rng)
                },
            )
            .collect::<Result<Vec<_>>>()?;

        for outcome in &outcomes {
            walk::credit(&mut run.table, &outcome.path, run.beta);
            run.stats.record(outcome);
        }
        tracing::trace!(batch_start, batch_end, "batch merged");
        batch_start = batch_end;
    }

    Ok(run.aggregate())
}

#[cfg(feature = "parallel")]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xbf58476d1ce4e5b9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94d049bb133111eb);
    x ^= x >> 31;
    x
}
