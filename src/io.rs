//! Plain-text edge lists and centrality files.
//!
//! Input graphs: one undirected edge per line, `u v` or `u v weight` (the weight column is
//! ignored), ids are 0-based integers and need not be contiguous. Blank lines and lines
//! starting with `#` are skipped.
//!
//! Centrality files: `"<u> <v> <centrality>\n"` per edge, no header. Line order carries no
//! meaning; readers re-sort.

use crate::graph::{AdjacencyList, Graph};
use crate::rank::{EdgeRanking, EdgeScore};
use crate::{Error, Result};
use std::io::{BufRead, Write};
use std::str::FromStr;

fn field<T: FromStr>(line: usize, it: &mut std::str::SplitWhitespace<'_>, what: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    let raw = it.next().ok_or_else(|| Error::Parse {
        line,
        message: format!("missing {what}"),
    })?;
    raw.parse().map_err(|e| Error::Parse {
        line,
        message: format!("bad {what} '{raw}': {e}"),
    })
}

fn node_id(line: usize, it: &mut std::str::SplitWhitespace<'_>, what: &str) -> Result<usize> {
    let id: usize = field(line, it, what)?;
    if id == usize::MAX {
        return Err(Error::Parse {
            line,
            message: format!("{what} id {id} is out of range"),
        });
    }
    Ok(id)
}

/// Read an undirected edge list. Self-loops are dropped and duplicates merged.
///
/// Ids too large to allocate a node table for fail with [`Error::TooLarge`].
pub fn read_edge_list<R: BufRead>(reader: R) -> Result<AdjacencyList> {
    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let u = node_id(i + 1, &mut it, "source")?;
        let v = node_id(i + 1, &mut it, "target")?;
        edges.push((u, v));
    }
    let graph = AdjacencyList::try_from_edges(0, &edges)?;
    tracing::debug!(
        records = edges.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "edge list loaded"
    );
    Ok(graph)
}

/// Write one `u v centrality` line per edge.
pub fn write_centrality<W: Write>(mut writer: W, ranking: &EdgeRanking) -> Result<()> {
    for e in ranking {
        writeln!(writer, "{} {} {}", e.u, e.v, e.score)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a file written by [`write_centrality`] (or any `u v centrality` listing).
pub fn read_centrality<R: BufRead>(reader: R) -> Result<EdgeRanking> {
    let mut scores = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut it = line.split_whitespace();
        let u: usize = field(i + 1, &mut it, "source")?;
        let v: usize = field(i + 1, &mut it, "target")?;
        let score: f64 = field(i + 1, &mut it, "centrality")?;
        scores.push(EdgeScore::new(u, v, score));
    }
    Ok(EdgeRanking::from_scores(scores))
}
