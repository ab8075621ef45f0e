//! In-memory network model.
//!
//! # Overview
//!
//! [`LabeledGraph`] wraps a petgraph [`StableUnGraph`] whose node weights
//! carry the node id and its attribute map. A stable graph is used so that
//! a [`NodeIndex`] keeps addressing the same node after other nodes are
//! removed, and so that an induced subgraph shares indices with the graph it
//! was cut from. Rankings computed on a subgroup can therefore be replayed
//! directly against the full graph.
//!
//! ## Edge Policy
//!
//! Edges are undirected and unweighted. Parallel edges collapse into one.
//! Self-loops are kept beside the petgraph storage rather than inside it:
//! they add two to a node's degree but never change connectivity or
//! shortest paths, so traversal code sees only proper edges.

#![allow(clippy::module_name_repetitions)]

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, HashSet};

use petgraph::stable_graph::{NodeIndex, StableUnGraph};
use serde::Serialize;

use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A node attribute value as found in the input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Str(String),
    /// Nested key/value block (e.g. GML `graphics [ ... ]`).
    List(Vec<(String, AttrValue)>),
}

impl AttrValue {
    /// Textual form used for group matching. Nested lists have none.
    #[must_use]
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Int(i) => Some(Cow::Owned(i.to_string())),
            Self::Float(f) => Some(Cow::Owned(f.to_string())),
            Self::Str(s) => Some(Cow::Borrowed(s.as_str())),
            Self::List(_) => None,
        }
    }

    /// True if this value's textual form equals `expected`.
    #[must_use]
    pub fn matches(&self, expected: &str) -> bool {
        self.as_text().is_some_and(|text| text == expected)
    }
}

/// Node weight: the id from the input file plus its attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl GraphNode {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }
}

// ---------------------------------------------------------------------------
// LabeledGraph
// ---------------------------------------------------------------------------

/// An undirected network with labeled, attributed nodes.
///
/// Cloning produces an independent copy; removal simulations take one by
/// value so no run ever sees another run's deletions.
#[derive(Debug, Clone)]
pub struct LabeledGraph {
    /// Undirected graph: nodes = [`GraphNode`]s, edges = unweighted links.
    pub graph: StableUnGraph<GraphNode, ()>,
    /// Mapping from node id to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Nodes carrying a self-loop.
    pub self_loops: HashSet<NodeIndex>,
}

impl Default for LabeledGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl LabeledGraph {
    #[must_use]
    pub fn new() -> Self {
        Self {
            graph: StableUnGraph::with_capacity(0, 0),
            node_map: HashMap::new(),
            self_loops: HashSet::new(),
        }
    }

    /// Build a graph from plain id lists, with no attributes.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids or edges naming unknown ids.
    pub fn from_edges(nodes: &[&str], edges: &[(&str, &str)]) -> Result<Self, GraphError> {
        let mut g = Self::new();
        for id in nodes {
            g.add_node((*id).to_string(), BTreeMap::new())?;
        }
        for (a, b) in edges {
            g.add_edge(a, b)?;
        }
        Ok(g)
    }

    /// Insert a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if `id` is already present.
    pub fn add_node(
        &mut self,
        id: String,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Result<NodeIndex, GraphError> {
        if self.node_map.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        let idx = self.graph.add_node(GraphNode {
            id: id.clone(),
            attributes,
        });
        self.node_map.insert(id, idx);
        Ok(idx)
    }

    /// Insert an undirected edge between two existing nodes.
    ///
    /// Returns `false` when the edge (or self-loop) was already present.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either endpoint is missing.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<bool, GraphError> {
        let ia = self
            .index_of(a)
            .ok_or_else(|| GraphError::UnknownNode(a.to_string()))?;
        let ib = self
            .index_of(b)
            .ok_or_else(|| GraphError::UnknownNode(b.to_string()))?;

        if ia == ib {
            return Ok(self.self_loops.insert(ia));
        }
        if self.graph.find_edge(ia, ib).is_some() {
            return Ok(false);
        }
        self.graph.add_edge(ia, ib, ());
        Ok(true)
    }

    /// Remove a node and every edge touching it.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not (or no longer) in the graph. A removal order
    /// pointing at a node that is already gone is a logic error upstream.
    pub fn remove_node(&mut self, idx: NodeIndex) -> GraphNode {
        let Some(node) = self.graph.remove_node(idx) else {
            panic!("attempted to remove node {idx:?} which is not in the graph");
        };
        self.node_map.remove(&node.id);
        self.self_loops.remove(&idx);
        node
    }

    /// Induced subgraph on `keep`, sharing node indices with `self`.
    #[must_use]
    pub fn induced(&self, keep: &HashSet<NodeIndex>) -> Self {
        let mut graph = self.graph.clone();
        graph.retain_nodes(|_, idx| keep.contains(&idx));

        let node_map = self
            .node_map
            .iter()
            .filter(|(_, idx)| keep.contains(idx))
            .map(|(id, idx)| (id.clone(), *idx))
            .collect();

        let self_loops = self
            .self_loops
            .iter()
            .filter(|idx| keep.contains(idx))
            .copied()
            .collect();

        Self {
            graph,
            node_map,
            self_loops,
        }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Proper edges plus self-loops.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count() + self.self_loops.len()
    }

    /// Number of edge endpoints at `idx`; a self-loop counts twice.
    #[must_use]
    pub fn degree(&self, idx: NodeIndex) -> usize {
        let looped = if self.self_loops.contains(&idx) { 2 } else { 0 };
        self.graph.neighbors(idx).count() + looped
    }

    #[must_use]
    pub fn contains(&self, idx: NodeIndex) -> bool {
        self.graph.contains_node(idx)
    }

    /// Look up the `NodeIndex` for a node id.
    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the id of a node.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(|n| n.id.as_str())
    }

    #[must_use]
    pub fn node(&self, idx: NodeIndex) -> Option<&GraphNode> {
        self.graph.node_weight(idx)
    }

    /// Live node indices in insertion (file) order.
    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
