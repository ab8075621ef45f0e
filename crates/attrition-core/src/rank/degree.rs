//! Degree centrality: the fraction of other nodes each node touches.
//!
//! `score(v) = degree(v) / (n - 1)`. With one node (or none) every node
//! scores 1.0, matching the usual convention for the degenerate case. A
//! self-loop adds two to the degree, so a looped node can score above 1.0.

use petgraph::stable_graph::NodeIndex;

use super::{Method, Ranker, Ranking};
use crate::graph::LabeledGraph;

/// Normalized degree centrality for every node, in node order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn degree_centrality(g: &LabeledGraph) -> Vec<(NodeIndex, f64)> {
    let n = g.node_count();
    if n <= 1 {
        return g.node_indices().map(|idx| (idx, 1.0)).collect();
    }

    let scale = 1.0 / (n - 1) as f64;
    g.node_indices()
        .map(|idx| (idx, g.degree(idx) as f64 * scale))
        .collect()
}

/// Highest-degree-first removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegreeRanker;

impl Ranker for DegreeRanker {
    fn method(&self) -> Method {
        Method::Degree
    }

    fn rank(&mut self, graph: &LabeledGraph) -> Ranking {
        Ranking::from_scores(degree_centrality(graph))
    }
}
