//! Typed errors for graph loading, partitioning and result tables.

/// Errors raised while building or reading a [`crate::graph::LabeledGraph`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// The GML text could not be tokenized or parsed.
    #[error("GML syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// No top-level `graph [ ... ]` block was found.
    #[error("input contains no graph block")]
    MissingGraph,

    /// A `node` block has no `id` key.
    #[error("node on line {line} has no id")]
    MissingNodeId { line: usize },

    /// An `edge` block is missing its `source` or `target`.
    #[error("edge on line {line} has no {endpoint}")]
    MissingEndpoint { line: usize, endpoint: &'static str },

    /// Two nodes share the same id.
    #[error("duplicate node id {0:?}")]
    DuplicateNode(String),

    /// A simple (non-multigraph) GML file lists the same edge twice.
    /// Endpoint order does not matter.
    #[error("edge on line {line} repeats {from:?} -- {to:?}")]
    DuplicateEdge { line: usize, from: String, to: String },

    /// An edge references a node id that was never declared.
    #[error("edge references unknown node {0:?}")]
    UnknownNode(String),

    /// A node lacks the attribute used to partition the graph.
    #[error("node {node:?} has no {attribute:?} attribute")]
    MissingAttribute { node: String, attribute: String },

    /// The node-link JSON document did not match the expected shape.
    #[error("invalid node-link document: {0}")]
    NodeLink(String),
}

/// Errors raised while assembling or reading a [`crate::table::ResultTable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Two rows were pushed under the same key.
    #[error("duplicate result key {0:?}")]
    DuplicateKey(String),

    /// A table file could not be parsed back.
    #[error("malformed result table on line {line}: {message}")]
    Malformed { line: usize, message: String },
}
