//! Split a network into subgroups by a categorical node attribute.
//!
//! A [`Subgroup`] is the subgraph induced by the nodes whose attribute
//! matches a configured value. It fixes the size `n` of a removal run and
//! supplies the initial ranking; it is never mutated itself.

use std::collections::HashSet;

use tracing::debug;

use crate::config::{AnalysisConfig, GroupSpec};
use crate::error::GraphError;
use crate::graph::LabeledGraph;

/// The induced subgraph of one attribute value.
#[derive(Debug, Clone)]
pub struct Subgroup {
    /// Name used in result keys (e.g. `bacti`).
    pub label: String,
    /// Attribute value that selected the members (e.g. `Bact`).
    pub value: String,
    /// Induced subgraph; indices match the full graph.
    pub graph: LabeledGraph,
}

impl Subgroup {
    /// Number of member nodes, the `n` of a removal run.
    #[must_use]
    pub fn size(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// Induced subgraph on nodes whose `attribute` equals `group.value`.
///
/// # Errors
///
/// Returns [`GraphError::MissingAttribute`] if any node lacks `attribute`.
pub fn partition(
    graph: &LabeledGraph,
    attribute: &str,
    group: &GroupSpec,
) -> Result<Subgroup, GraphError> {
    let mut members = HashSet::new();
    for idx in graph.node_indices() {
        let Some(node) = graph.node(idx) else {
            continue;
        };
        let value = node
            .attribute(attribute)
            .ok_or_else(|| GraphError::MissingAttribute {
                node: node.id.clone(),
                attribute: attribute.to_string(),
            })?;
        if value.matches(&group.value) {
            members.insert(idx);
        }
    }

    let sub = graph.induced(&members);
    debug!(
        group = %group.label,
        nodes = sub.node_count(),
        edges = sub.edge_count(),
        "partitioned subgroup"
    );

    Ok(Subgroup {
        label: group.label.clone(),
        value: group.value.clone(),
        graph: sub,
    })
}

/// Partition `graph` into every group of `config`, in config order.
///
/// # Errors
///
/// Propagates [`partition`] errors.
pub fn partition_all(
    graph: &LabeledGraph,
    config: &AnalysisConfig,
) -> Result<Vec<Subgroup>, GraphError> {
    config
        .groups
        .iter()
        .map(|group| partition(graph, &config.group_attribute, group))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::parse_gml;

    const NET: &str = r#"graph [
  node [ id 1 group "fungi" ]
  node [ id 2 group "fungi" ]
  node [ id 3 group "Bact" ]
  node [ id 4 group "lipid" ]
  edge [ source 1 target 2 ]
  edge [ source 2 target 3 ]
  edge [ source 3 target 4 ]
]"#;

    #[test]
    fn induced_subgraph_keeps_internal_edges_only() {
        let g = parse_gml(NET).expect("graph");
        let fungi = partition(&g, "group", &GroupSpec::new("fungi", "fungi")).expect("partition");
        assert_eq!(fungi.size(), 2);
        assert_eq!(fungi.graph.edge_count(), 1);
        assert_eq!(fungi.graph.index_of("1"), g.index_of("1"));
    }

    #[test]
    fn no_match_gives_empty_subgroup() {
        let g = parse_gml(NET).expect("graph");
        let none = partition(&g, "group", &GroupSpec::new("x", "archaea")).expect("partition");
        assert!(none.is_empty());
    }

    #[test]
    fn match_is_case_sensitive() {
        let g = parse_gml(NET).expect("graph");
        let bact = partition(&g, "group", &GroupSpec::new("bacti", "bact")).expect("partition");
        assert!(bact.is_empty());
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let g = parse_gml(r#"graph [ node [ id 1 group "fungi" ] node [ id 2 ] ]"#).expect("graph");
        let err = partition(&g, "group", &GroupSpec::new("fungi", "fungi")).expect_err("missing");
        assert_eq!(
            err,
            GraphError::MissingAttribute {
                node: "2".into(),
                attribute: "group".into()
            }
        );
    }

    #[test]
    fn partition_all_follows_config_order() {
        let g = parse_gml(NET).expect("graph");
        let groups = partition_all(&g, &AnalysisConfig::default()).expect("partition");
        let sizes: Vec<_> = groups.iter().map(|s| (s.label.as_str(), s.size())).collect();
        assert_eq!(sizes, vec![("fungi", 2), ("bacti", 1), ("lipid", 1)]);
    }
}
