//! `kpath`: edge centrality estimated from length-bounded simple-path walks.
//!
//! Exact edge betweenness needs all-pairs shortest paths. This crate instead runs `rho`
//! short random walks (at most `kappa` nodes, never revisiting a node) and adds a fixed
//! increment `beta` to every edge a walk traverses. Edges lying on many short paths
//! accumulate weight quickly; the final ranking is a cheap proxy for betweenness.
//!
//! Two selection policies are supported:
//! - [`Policy::Uniform`]: uniform start node, uniform step.
//! - [`Policy::EdgeWeighted`]: degree-biased start node, steps proportional to the
//!   weight each edge has accrued so far (positive feedback between walks).
//!
//! Public invariants (must not drift):
//! - **Canonical edges**: every reported edge `(u, v)` has `u < v`; each undirected edge
//!   appears exactly once.
//! - **Monotone weights**: weights only ever increase during a run.
//! - **Determinism**: identical graph + [`CentralityConfig`] (including `seed`) produce
//!   identical output, with or without the `parallel` feature's thread count.
//! - **Order dependence**: the sequential runner applies walks strictly one after another;
//!   later walks see the weights written by earlier ones.

pub mod centrality;
pub mod graph;
pub mod io;
pub mod rank;
pub mod sample;
pub mod walk;
pub mod weights;

#[cfg(feature = "parallel")]
pub use centrality::edge_centrality_parallel;
pub use centrality::{edge_centrality, CentralityConfig, CentralityRun, Phase, RunStats, Weighting};
pub use graph::{AdjacencyList, Graph};
pub use io::{read_centrality, read_edge_list, write_centrality};
pub use rank::{rank_displacement, top_k, EdgeRanking, EdgeScore};
pub use sample::{sample_weighted, AliasTable};
pub use walk::{propagate, Policy, Termination, WalkOutcome, WalkScratch};
pub use weights::{degree_weights, EdgeKey, WeightTable};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("degenerate graph: {nodes} nodes, {edges} edges")]
    DegenerateGraph { nodes: usize, edges: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("graph too large: {0}")]
    TooLarge(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
