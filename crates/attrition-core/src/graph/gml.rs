//! GML reader.
//!
//! # Overview
//!
//! Reads the subset of GML (Graph Modelling Language) written by networkx,
//! igraph and Cytoscape:
//!
//! ```text
//! graph [
//!   directed 0
//!   node [ id 0 label "Mortierella" group "fungi" ]
//!   node [ id 1 label "Bacillus" group "Bact" ]
//!   edge [ source 0 target 1 weight 0.4 ]
//! ]
//! ```
//!
//! A document is a list of `key value` pairs where a value is an integer, a
//! real, a double-quoted string, or a nested `[ ... ]` list. `#` starts a
//! comment that runs to the end of the line. Strings may contain HTML
//! character entities (`&quot;`, `&amp;`, `&#233;`, ...), which are decoded.
//!
//! ## Mapping
//!
//! Each `node` block becomes a [`GraphNode`](super::build::GraphNode) keyed by
//! its `id`; every other key of the block (`label` included) becomes an
//! attribute. Each `edge` block contributes an undirected edge between its
//! `source` and `target` ids; edge attributes are ignored. `directed 1`
//! graphs are accepted and read as undirected, so `a -> b` and `b -> a`
//! merge into one edge. Any other repeated edge is rejected unless the
//! graph declares `multigraph 1`.

use std::collections::{BTreeMap, HashSet};

use tracing::{debug, instrument};

use super::build::{AttrValue, LabeledGraph};
use crate::error::GraphError;

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Key(String),
    Int(i64),
    Real(f64),
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    const fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
        }
    }

    fn error(&self, message: impl Into<String>) -> GraphError {
        GraphError::Syntax {
            line: self.line,
            message: message.into(),
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    fn skip_trivia(&mut self) {
        while let Some(b) = self.peek_byte() {
            match b {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'#' => {
                    while let Some(c) = self.peek_byte() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                c if c.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
    }

    /// Next token and the line it starts on, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<(Token, usize)>, GraphError> {
        self.skip_trivia();
        let Some(b) = self.peek_byte() else {
            return Ok(None);
        };
        let line = self.line;

        let token = match b {
            b'[' => {
                self.pos += 1;
                Token::Open
            }
            b']' => {
                self.pos += 1;
                Token::Close
            }
            b'"' => self.string()?,
            b'+' | b'-' | b'.' | b'0'..=b'9' => self.number()?,
            c if c.is_ascii_alphabetic() || c == b'_' => self.key(),
            _ => {
                let ch = self.src[self.pos..].chars().next().unwrap_or('?');
                return Err(self.error(format!("unexpected character {ch:?}")));
            }
        };

        Ok(Some((token, line)))
    }

    fn key(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_byte()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        Token::Key(self.src[start..self.pos].to_string())
    }

    fn string(&mut self) -> Result<Token, GraphError> {
        let start = self.pos + 1;
        let Some(len) = self.src[start..].find('"') else {
            return Err(self.error("unterminated string"));
        };
        let raw = &self.src[start..start + len];
        self.line += raw.matches('\n').count();
        self.pos = start + len + 1;
        Ok(Token::Str(decode_entities(raw)))
    }

    fn number(&mut self) -> Result<Token, GraphError> {
        let start = self.pos;
        let bytes = self.src.as_bytes();
        let mut is_real = false;

        if matches!(self.peek_byte(), Some(b'+' | b'-')) {
            self.pos += 1;
        }
        while self.peek_byte().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek_byte() == Some(b'.') {
            is_real = true;
            self.pos += 1;
            while self.peek_byte().is_some_and(|c| c.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            let exp_start = self.pos;
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if bytes.get(self.pos).is_some_and(u8::is_ascii_digit) {
                is_real = true;
                while self.peek_byte().is_some_and(|c| c.is_ascii_digit()) {
                    self.pos += 1;
                }
            } else {
                self.pos = exp_start;
            }
        }

        let text = &self.src[start..self.pos];
        if !is_real {
            if let Ok(value) = text.parse::<i64>() {
                return Ok(Token::Int(value));
            }
        }
        text.parse::<f64>()
            .map(Token::Real)
            .map_err(|_| self.error(format!("invalid number {text:?}")))
    }
}

/// Decode the HTML character entities GML writers use inside strings.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').and_then(|semi| {
            let name = &tail[1..semi];
            let ch = match name {
                "quot" => Some('"'),
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "apos" => Some('\''),
                _ => name.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|c| (c, semi))
        });

        if let Some((ch, semi)) = decoded {
            out.push(ch);
            rest = &tail[semi + 1..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Int(i64),
    Real(f64),
    Str(String),
    List(Vec<Entry>),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: Value,
    line: usize,
}

impl Value {
    fn into_attr(self) -> AttrValue {
        match self {
            Self::Int(i) => AttrValue::Int(i),
            Self::Real(f) => AttrValue::Float(f),
            Self::Str(s) => AttrValue::Str(s),
            Self::List(entries) => AttrValue::List(
                entries
                    .into_iter()
                    .map(|e| (e.key, e.value.into_attr()))
                    .collect(),
            ),
        }
    }

    /// Textual form of a scalar used as a node id.
    fn as_id(&self) -> Option<String> {
        match self {
            Self::Int(i) => Some(i.to_string()),
            Self::Real(f) => Some(f.to_string()),
            Self::Str(s) => Some(s.clone()),
            Self::List(_) => None,
        }
    }
}

fn parse_list(lexer: &mut Lexer<'_>, nested: bool) -> Result<Vec<Entry>, GraphError> {
    let mut entries = Vec::new();
    loop {
        let Some((token, line)) = lexer.next_token()? else {
            if nested {
                return Err(lexer.error("unterminated list: missing ']'"));
            }
            return Ok(entries);
        };

        let key = match token {
            Token::Key(key) => key,
            Token::Close if nested => return Ok(entries),
            other => return Err(lexer.error(format!("expected a key, found {other:?}"))),
        };

        let value = match lexer.next_token()? {
            Some((Token::Int(i), _)) => Value::Int(i),
            Some((Token::Real(f), _)) => Value::Real(f),
            Some((Token::Str(s), _)) => Value::Str(s),
            Some((Token::Open, _)) => Value::List(parse_list(lexer, true)?),
            Some((other, _)) => {
                return Err(lexer.error(format!("expected a value for {key:?}, found {other:?}")));
            }
            None => return Err(lexer.error(format!("missing value for {key:?}"))),
        };

        entries.push(Entry { key, value, line });
    }
}

// ---------------------------------------------------------------------------
// Graph construction
// ---------------------------------------------------------------------------

struct NodeDecl {
    id: String,
    attributes: BTreeMap<String, AttrValue>,
}

fn node_decl(entry: Entry) -> Result<NodeDecl, GraphError> {
    let Value::List(items) = entry.value else {
        return Err(GraphError::Syntax {
            line: entry.line,
            message: "node must be a [ ... ] block".to_string(),
        });
    };

    let mut id = None;
    let mut attributes = BTreeMap::new();
    for item in items {
        if item.key == "id" {
            id = item.value.as_id();
        } else {
            attributes.insert(item.key, item.value.into_attr());
        }
    }

    let id = id.ok_or(GraphError::MissingNodeId { line: entry.line })?;
    Ok(NodeDecl { id, attributes })
}

/// An edge block's endpoints and the line it started on.
struct EdgeDecl {
    line: usize,
    source: String,
    target: String,
}

fn edge_decl(entry: Entry) -> Result<EdgeDecl, GraphError> {
    let Value::List(items) = entry.value else {
        return Err(GraphError::Syntax {
            line: entry.line,
            message: "edge must be a [ ... ] block".to_string(),
        });
    };

    let mut source = None;
    let mut target = None;
    for item in &items {
        match item.key.as_str() {
            "source" => source = item.value.as_id(),
            "target" => target = item.value.as_id(),
            _ => {}
        }
    }

    let source = source.ok_or(GraphError::MissingEndpoint {
        line: entry.line,
        endpoint: "source",
    })?;
    let target = target.ok_or(GraphError::MissingEndpoint {
        line: entry.line,
        endpoint: "target",
    })?;
    Ok(EdgeDecl {
        line: entry.line,
        source,
        target,
    })
}

/// Parse GML text into a [`LabeledGraph`].
///
/// All nodes are inserted before any edge, so edges may precede the nodes
/// they reference in the file. A repeated edge is an error unless the graph
/// declares `multigraph 1`, in which case repeats collapse into one edge.
///
/// # Errors
///
/// Returns [`GraphError`] on syntax errors, a missing `graph` block,
/// nodes without ids, duplicate ids, repeated edges in a simple graph, or
/// edges naming unknown nodes.
#[instrument(skip_all, fields(bytes = src.len()))]
pub fn parse_gml(src: &str) -> Result<LabeledGraph, GraphError> {
    let mut lexer = Lexer::new(src);
    let document = parse_list(&mut lexer, false)?;

    let items = document
        .into_iter()
        .find_map(|entry| match entry.value {
            Value::List(items) if entry.key == "graph" => Some(items),
            _ => None,
        })
        .ok_or(GraphError::MissingGraph)?;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    let mut directed = false;
    let mut multigraph = false;
    for entry in items {
        match entry.key.as_str() {
            "node" => nodes.push(node_decl(entry)?),
            "edge" => edges.push(edge_decl(entry)?),
            "directed" => directed = entry.value == Value::Int(1),
            "multigraph" => multigraph = entry.value == Value::Int(1),
            _ => {}
        }
    }

    let mut graph = LabeledGraph::new();
    for node in nodes {
        graph.add_node(node.id, node.attributes)?;
    }
    if directed {
        debug!("directed GML input; edges are read as undirected");
    }

    // A directed file may hold both `a -> b` and `b -> a`; only an exact
    // repeat is a duplicate there.
    let mut seen = HashSet::with_capacity(edges.len());
    let mut collapsed = 0usize;
    for edge in &edges {
        let (a, b) = (edge.source.as_str(), edge.target.as_str());
        let key = if directed || a <= b { (a, b) } else { (b, a) };
        if !seen.insert(key) && !multigraph {
            return Err(GraphError::DuplicateEdge {
                line: edge.line,
                from: edge.source.clone(),
                to: edge.target.clone(),
            });
        }
        if !graph.add_edge(a, b)? {
            collapsed += 1;
        }
    }

    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        multigraph,
        collapsed_edges = collapsed,
        "parsed GML graph"
    );
    Ok(graph)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
Creator "test"
graph [
  directed 0
  # three taxa, two groups
  node [ id 0 label "Mortierella" group "fungi" ]
  node [ id 1 label "Bacillus" group "Bact" abundance 1.5e2 ]
  node [
    id 2
    label "R&amp;D &quot;x&quot;"
    group "Bact"
    graphics [ x -1.0 y 2 ]
  ]
  edge [ source 0 target 1 weight 0.4 ]
  edge [ source 1 target 2 ]
]
"#;

    #[test]
    fn parses_nodes_edges_and_attributes() {
        let g = parse_gml(SAMPLE).expect("valid GML");
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);

        let n1 = g.node(g.index_of("1").expect("node 1")).expect("weight");
        assert_eq!(n1.attribute("group"), Some(&AttrValue::Str("Bact".into())));
        assert_eq!(n1.attribute("abundance"), Some(&AttrValue::Float(150.0)));
        assert!(n1.attribute("id").is_none());
    }

    #[test]
    fn decodes_entities_and_keeps_nested_lists() {
        let g = parse_gml(SAMPLE).expect("valid GML");
        let n2 = g.node(g.index_of("2").expect("node 2")).expect("weight");
        assert_eq!(
            n2.attribute("label"),
            Some(&AttrValue::Str("R&D \"x\"".into()))
        );
        assert_eq!(
            n2.attribute("graphics"),
            Some(&AttrValue::List(vec![
                ("x".into(), AttrValue::Float(-1.0)),
                ("y".into(), AttrValue::Int(2)),
            ]))
        );
    }

    #[test]
    fn string_ids_are_supported() {
        let g = parse_gml(r#"graph [ node [ id "a" ] node [ id "b" ] edge [ source "a" target "b" ] ]"#)
            .expect("valid GML");
        assert_eq!(g.edge_count(), 1);
        assert!(g.index_of("a").is_some());
    }

    #[test]
    fn edges_may_precede_nodes() {
        let g = parse_gml("graph [ edge [ source 1 target 2 ] node [ id 1 ] node [ id 2 ] ]")
            .expect("valid GML");
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn missing_graph_block() {
        let err = parse_gml("Creator \"nobody\"").expect_err("no graph");
        assert_eq!(err, GraphError::MissingGraph);
    }

    #[test]
    fn unterminated_list_reports_line() {
        let err = parse_gml("graph [\n node [ id 1 ]\n").expect_err("unterminated");
        assert!(matches!(err, GraphError::Syntax { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn unterminated_string() {
        let err = parse_gml("graph [ node [ id 1 label \"oops ] ]").expect_err("bad string");
        assert!(matches!(err, GraphError::Syntax { .. }));
    }

    #[test]
    fn node_without_id() {
        let err = parse_gml("graph [\n node [ label \"x\" ]\n]").expect_err("no id");
        assert_eq!(err, GraphError::MissingNodeId { line: 2 });
    }

    #[test]
    fn edge_to_unknown_node() {
        let err = parse_gml("graph [ node [ id 1 ] edge [ source 1 target 9 ] ]")
            .expect_err("unknown node");
        assert_eq!(err, GraphError::UnknownNode("9".into()));
    }

    #[test]
    fn edge_without_target() {
        let err = parse_gml("graph [ node [ id 1 ] edge [ source 1 ] ]").expect_err("no target");
        assert!(matches!(
            err,
            GraphError::MissingEndpoint {
                endpoint: "target",
                ..
            }
        ));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let err = parse_gml("graph [ node [ id 1 ] node [ id 1 ] ]").expect_err("duplicate");
        assert_eq!(err, GraphError::DuplicateNode("1".into()));
    }

    #[test]
    fn repeated_edge_rejected_in_simple_graph() {
        let src = "graph [\n  node [ id 1 ]\n  node [ id 2 ]\n  edge [ source 1 target 2 ]\n  edge [ source 2 target 1 ]\n]";
        let err = parse_gml(src).expect_err("repeated edge");
        assert_eq!(
            err,
            GraphError::DuplicateEdge {
                line: 5,
                from: "2".into(),
                to: "1".into(),
            }
        );
    }

    #[test]
    fn repeated_self_loop_rejected_in_simple_graph() {
        let err = parse_gml(
            "graph [ node [ id 1 ] edge [ source 1 target 1 ] edge [ source 1 target 1 ] ]",
        )
        .expect_err("repeated loop");
        assert!(matches!(err, GraphError::DuplicateEdge { .. }));
    }

    #[test]
    fn multigraph_collapses_repeated_edges() {
        let g = parse_gml(
            "graph [ multigraph 1 node [ id 1 ] node [ id 2 ]
               edge [ source 1 target 2 ] edge [ source 2 target 1 ] edge [ source 1 target 2 ] ]",
        )
        .expect("multigraph");
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn directed_reverse_pair_merges() {
        let g = parse_gml(
            "graph [ directed 1 node [ id 1 ] node [ id 2 ]
               edge [ source 1 target 2 ] edge [ source 2 target 1 ] ]",
        )
        .expect("directed");
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn self_loop_is_kept() {
        let g = parse_gml("graph [ node [ id 1 ] node [ id 2 ] edge [ source 1 target 1 ] ]")
            .expect("loop");
        assert_eq!(g.edge_count(), 1);
        let one = g.index_of("1").expect("node 1");
        assert_eq!(g.degree(one), 2);
    }

    #[test]
    fn entity_decoding_leaves_unknown_sequences() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
        assert_eq!(decode_entities("caf&#233;"), "café");
        assert_eq!(decode_entities("&#x41;"), "A");
    }
}
