//! Network model and loaders.
//!
//! # Overview
//!
//! ```text
//! .gml / .json file
//!        ↓  load_graph()
//! LabeledGraph (StableUnGraph<GraphNode, ()> + id → NodeIndex map)
//!        ↓  components::largest_component_size()   (per removal step)
//!        ↓  stats::GraphStats::from_graph()        (inspect)
//! ```
//!
//! The input format is picked from the file extension: `.json` is read as
//! node-link JSON, anything else as GML.

pub mod build;
pub mod components;
pub mod gml;
pub mod node_link;
pub mod stats;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

pub use build::{AttrValue, GraphNode, LabeledGraph};
pub use components::{component_sizes, largest_component_size};
pub use gml::parse_gml;
pub use node_link::parse_node_link;
pub use stats::GraphStats;

/// Read a graph from `path`, choosing the parser by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not parse.
#[instrument]
pub fn load_graph(path: &Path) -> Result<LabeledGraph> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("failed to read graph file {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        parse_node_link(&src)
    } else {
        parse_gml(&src)
    };
    let graph =
        parsed.with_context(|| format!("failed to parse graph file {}", path.display()))?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}
