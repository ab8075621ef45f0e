//! Betweenness centrality via Brandes' algorithm.
//!
//! # Overview
//!
//! Betweenness centrality measures how often a node lies on shortest paths
//! between other pairs of nodes. High-betweenness nodes are bridges: removing
//! them is what fragments a network fastest.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! The graph is undirected, so every pair is counted once from each end.
//! For `n > 2` the raw sums are multiplied by `1 / ((n - 1)(n - 2))`, which
//! folds the double counting into the usual normalized range `[0, 1]`.
//! Smaller graphs have no intermediate nodes and all scores are 0.

use std::collections::VecDeque;

use petgraph::stable_graph::NodeIndex;
use petgraph::visit::NodeIndexable;
use tracing::instrument;

use super::{Method, Ranker, Ranking};
use crate::graph::LabeledGraph;

/// Normalized betweenness centrality for every node, in node order.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(g), fields(nodes = g.node_count()))]
pub fn betweenness_centrality(g: &LabeledGraph) -> Vec<(NodeIndex, f64)> {
    let graph = &g.graph;
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    let bound = graph.node_bound();

    // Index-addressed accumulator; holes left by removed nodes stay at 0.
    let mut cb: Vec<f64> = vec![0.0; bound];

    for s in graph.node_indices() {
        let si = s.index();

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); bound];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; bound];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; bound];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::new();
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            for w in graph.neighbors(v) {
                let wi = w.index();

                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }

                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; bound];

        while let Some(w) = stack.pop() {
            let wi = w.index();

            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }

            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    let scale = if n > 2 {
        1.0 / ((n - 1) * (n - 2)) as f64
    } else {
        1.0
    };

    graph
        .node_indices()
        .map(|idx| (idx, cb[idx.index()] * scale))
        .collect()
}

/// Highest-betweenness-first removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct BetweennessRanker;

impl Ranker for BetweennessRanker {
    fn method(&self) -> Method {
        Method::Betweenness
    }

    fn rank(&mut self, graph: &LabeledGraph) -> Ranking {
        Ranking::from_scores(betweenness_centrality(graph))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
