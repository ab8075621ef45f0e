//! Summary statistics for a loaded network.
//!
//! - **node_count** / **edge_count**: size of the graph.
//! - **density**: `edge_count / (node_count * (node_count - 1) / 2)` for an
//!   undirected graph; 0.0 with fewer than two nodes.
//! - **component_count**: number of connected components.
//! - **largest_component**: node count of the biggest component, the
//!   quantity the removal simulator tracks.
//! - **isolated_node_count**: nodes with no incident edge.

use serde::Serialize;

use super::build::LabeledGraph;
use super::components::component_sizes;

/// Summary statistics for a [`LabeledGraph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub density: f64,
    pub component_count: usize,
    pub largest_component: usize,
    pub isolated_node_count: usize,
}

impl GraphStats {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_graph(g: &LabeledGraph) -> Self {
        let node_count = g.node_count();
        let edge_count = g.edge_count();

        let density = if node_count < 2 {
            0.0
        } else {
            let max_edges = (node_count * (node_count - 1) / 2) as f64;
            edge_count as f64 / max_edges
        };

        let sizes = component_sizes(g);
        let isolated_node_count = g
            .node_indices()
            .filter(|&idx| g.degree(idx) == 0)
            .count();

        Self {
            node_count,
            edge_count,
            density,
            component_count: sizes.len(),
            largest_component: sizes.first().copied().unwrap_or(0),
            isolated_node_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_stats() {
        let stats = GraphStats::from_graph(&LabeledGraph::new());
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.component_count, 0);
        assert_eq!(stats.largest_component, 0);
        assert!(stats.density.abs() < f64::EPSILON);
    }

    #[test]
    fn triangle_plus_isolated() {
        let g = LabeledGraph::from_edges(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a")],
        )
        .expect("graph");
        let stats = GraphStats::from_graph(&g);
        assert_eq!(stats.edge_count, 3);
        assert_eq!(stats.component_count, 2);
        assert_eq!(stats.largest_component, 3);
        assert_eq!(stats.isolated_node_count, 1);
        // 3 of 6 possible edges
        assert!((stats.density - 0.5).abs() < 1e-12);
    }
}
