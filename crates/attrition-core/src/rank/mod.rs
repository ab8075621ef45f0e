//! Removal orders ("attack strategies").
//!
//! # Overview
//!
//! A [`Ranker`] turns a graph into a [`Ranking`]: nodes sorted by an
//! importance score, highest first. The removal simulator consumes the
//! ranking front to back and, in sequential mode, asks the ranker for a
//! fresh ranking of the shrinking graph after every removal.
//!
//! - **Degree** (`degree`): normalized degree centrality.
//! - **Betweenness** (`betweenness`): normalized betweenness centrality
//!   (Brandes).
//! - **Random** (`random`): a uniform shuffle; scores are all zero and the
//!   order is never refreshed.
//!
//! ## Ties
//!
//! Sorting is stable, so nodes with equal scores keep the graph's node
//! order (insertion order from the input file). Given the same input file
//! the degree and betweenness orders are fully deterministic.

pub mod betweenness;
pub mod degree;
pub mod random;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use petgraph::stable_graph::NodeIndex;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::graph::LabeledGraph;

pub use betweenness::{BetweennessRanker, betweenness_centrality};
pub use degree::{DegreeRanker, degree_centrality};
pub use random::RandomRanker;

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// The attack strategies understood by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Degree,
    Betweenness,
    Random,
}

impl Method {
    pub const ALL: [Self; 3] = [Self::Degree, Self::Betweenness, Self::Random];

    /// Stable lowercase name (`degree`, `betweenness`, `random`).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Random => "random",
        }
    }

    /// Suffix appended to a group label to form a result column key.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Degree => "deg",
            Self::Betweenness => "bet",
            Self::Random => "rand",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.name() == s || m.suffix() == s)
            .ok_or_else(|| {
                format!("unknown method {s:?}; expected one of degree, betweenness, random")
            })
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Nodes ordered by score, highest first.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ranking {
    entries: VecDeque<(NodeIndex, f64)>,
}

impl Ranking {
    /// Sort `(node, score)` pairs by score descending. Equal scores keep
    /// their input order.
    #[must_use]
    pub fn from_scores(mut scores: Vec<(NodeIndex, f64)>) -> Self {
        scores.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self {
            entries: scores.into(),
        }
    }

    /// Take `order` as-is, every score 0.
    #[must_use]
    pub fn from_order(order: Vec<NodeIndex>) -> Self {
        Self {
            entries: order.into_iter().map(|idx| (idx, 0.0)).collect(),
        }
    }

    /// Remove and return the highest-ranked node.
    pub fn pop_front(&mut self) -> Option<(NodeIndex, f64)> {
        self.entries.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(NodeIndex, f64)> {
        self.entries.iter()
    }

    /// Node indices in ranking order.
    #[must_use]
    pub fn nodes(&self) -> Vec<NodeIndex> {
        self.entries.iter().map(|(idx, _)| *idx).collect()
    }
}

// ---------------------------------------------------------------------------
// Ranker
// ---------------------------------------------------------------------------

/// Produces removal orders for one attack strategy.
pub trait Ranker {
    fn method(&self) -> Method;

    /// Rank every node currently in `graph`.
    fn rank(&mut self, graph: &LabeledGraph) -> Ranking;

    /// Whether sequential mode should call [`Ranker::rank`] again after each
    /// removal.
    fn refreshes(&self) -> bool {
        true
    }
}

/// Build the ranker for `method`. `rng` is only used by random removal.
#[must_use]
pub fn ranker_for(method: Method, rng: &mut StdRng) -> Box<dyn Ranker + '_> {
    match method {
        Method::Degree => Box::new(DegreeRanker),
        Method::Betweenness => Box::new(BetweennessRanker),
        Method::Random => Box::new(RandomRanker::new(rng)),
    }
}
