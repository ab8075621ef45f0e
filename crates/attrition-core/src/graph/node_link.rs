//! Node-link JSON reader (the `networkx.node_link_data` layout).
//!
//! ```json
//! {
//!   "nodes": [{"id": 0, "group": "fungi"}, {"id": 1, "group": "Bact"}],
//!   "links": [{"source": 0, "target": 1}]
//! }
//! ```
//!
//! `edges` is accepted in place of `links`. Booleans become `"true"` /
//! `"false"` strings, nested objects become nested attribute lists, and
//! `null` attributes are dropped.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, instrument};

use super::build::{AttrValue, LabeledGraph};
use crate::error::GraphError;

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn to_attr(value: Value) -> Option<AttrValue> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(AttrValue::Str(b.to_string())),
        Value::Number(n) => n
            .as_i64()
            .map(AttrValue::Int)
            .or_else(|| n.as_f64().map(AttrValue::Float)),
        Value::String(s) => Some(AttrValue::Str(s)),
        Value::Array(items) => Some(AttrValue::List(
            items
                .into_iter()
                .enumerate()
                .filter_map(|(i, v)| to_attr(v).map(|a| (i.to_string(), a)))
                .collect(),
        )),
        Value::Object(map) => Some(AttrValue::List(
            map.into_iter()
                .filter_map(|(k, v)| to_attr(v).map(|a| (k, a)))
                .collect(),
        )),
    }
}

/// Parse a node-link JSON document into a [`LabeledGraph`].
///
/// # Errors
///
/// Returns [`GraphError::NodeLink`] if the document is not valid JSON or
/// lacks a `nodes` array, and the usual graph errors for duplicate or
/// unknown ids.
#[instrument(skip_all, fields(bytes = src.len()))]
pub fn parse_node_link(src: &str) -> Result<LabeledGraph, GraphError> {
    let doc: Value =
        serde_json::from_str(src).map_err(|e| GraphError::NodeLink(e.to_string()))?;
    let Value::Object(mut doc) = doc else {
        return Err(GraphError::NodeLink("top level must be an object".into()));
    };

    let Some(Value::Array(nodes)) = doc.remove("nodes") else {
        return Err(GraphError::NodeLink("missing \"nodes\" array".into()));
    };
    let links = match doc.remove("links").or_else(|| doc.remove("edges")) {
        Some(Value::Array(links)) => links,
        None => Vec::new(),
        Some(_) => return Err(GraphError::NodeLink("\"links\" must be an array".into())),
    };

    let mut graph = LabeledGraph::new();
    for (position, node) in nodes.into_iter().enumerate() {
        let Value::Object(mut fields) = node else {
            return Err(GraphError::NodeLink(format!("node #{position} is not an object")));
        };
        let id = fields
            .remove("id")
            .as_ref()
            .and_then(scalar_id)
            .ok_or_else(|| GraphError::NodeLink(format!("node #{position} has no id")))?;
        let attributes: BTreeMap<_, _> = fields
            .into_iter()
            .filter_map(|(k, v)| to_attr(v).map(|a| (k, a)))
            .collect();
        graph.add_node(id, attributes)?;
    }

    for (position, link) in links.iter().enumerate() {
        let endpoint = |key: &str| {
            link.get(key).and_then(scalar_id).ok_or_else(|| {
                GraphError::NodeLink(format!("link #{position} has no {key}"))
            })
        };
        let source = endpoint("source")?;
        let target = endpoint("target")?;
        graph.add_edge(&source, &target)?;
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "parsed node-link graph"
    );
    Ok(graph)
}
