//! Connected-component measurements.
//!
//! The removal simulator asks for the largest component after every step, so
//! this is the hot path of a run. A plain iterative DFS over the live nodes is
//! O(V + E) and needs nothing beyond a visited bitmap sized to the index
//! bound (the stable graph leaves holes where nodes were removed).

use petgraph::visit::NodeIndexable;

use super::build::LabeledGraph;

/// Sizes of every connected component, sorted descending.
#[must_use]
pub fn component_sizes(g: &LabeledGraph) -> Vec<usize> {
    let graph = &g.graph;
    let mut visited = vec![false; graph.node_bound()];
    let mut sizes = Vec::new();

    for start in graph.node_indices() {
        if visited[start.index()] {
            continue;
        }

        let mut stack = vec![start];
        visited[start.index()] = true;
        let mut component_size = 0usize;

        while let Some(node) = stack.pop() {
            component_size += 1;
            for neighbor in graph.neighbors(node) {
                if !visited[neighbor.index()] {
                    visited[neighbor.index()] = true;
                    stack.push(neighbor);
                }
            }
        }

        sizes.push(component_size);
    }

    sizes.sort_unstable_by(|a, b| b.cmp(a));
    sizes
}

/// Size of the largest connected component (0 for an empty graph).
#[must_use]
pub fn largest_component_size(g: &LabeledGraph) -> usize {
    component_sizes(g).first().copied().unwrap_or(0)
}
