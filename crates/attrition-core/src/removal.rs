//! Node-removal simulation.
//!
//! # Overview
//!
//! One loop serves every attack strategy. Given a subgroup of size `n`, the
//! full network, and a [`Ranker`]:
//!
//! 1. Rank the subgroup's nodes.
//! 2. Record `(0, |LCC| / n)` for the untouched network.
//! 3. For `i = 1 .. n-1`, remove the highest-ranked remaining node from the
//!    full network, optionally re-rank the whole remaining network
//!    (sequential attack), and record `(i / n, |LCC| / n)`.
//!
//! Exactly `n - 1` nodes are removed, so the last recorded point still has
//! survivors. Nodes outside the subgroup stay in the network and count
//! toward the largest component.
//!
//! # Ownership
//!
//! [`simulate`] takes the network by value. Callers clone the loaded graph
//! once per run, which keeps runs for different subgroups independent.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::graph::{LabeledGraph, largest_component_size};
use crate::partition::Subgroup;
use crate::rank::{Method, Ranker};
use crate::vulnerability::vulnerability_index;

// ---------------------------------------------------------------------------
// RemovalCurve
// ---------------------------------------------------------------------------

/// Fraction removed (`x`) against largest-component fraction (`y`).
///
/// Both vectors always have the same length: `n` for a subgroup of `n`
/// nodes, or zero for an empty subgroup.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RemovalCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl RemovalCurve {
    #[must_use]
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, removed_fraction: f64, component_fraction: f64) {
        self.x.push(removed_fraction);
        self.y.push(component_fraction);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `(x, y)` pairs in step order.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Result of one removal run.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovalOutcome {
    pub method: Method,
    pub curve: RemovalCurve,
    /// `None` for an empty subgroup.
    pub vulnerability: Option<f64>,
    /// Ids of removed nodes, in removal order.
    pub removed: Vec<String>,
}

/// Run one attack against `graph`.
///
/// `recalculate` selects a sequential attack: after every removal the
/// ranker re-ranks all nodes left in `graph` (not just the subgroup). It has
/// no effect on rankers that do not refresh.
///
/// An empty subgroup yields an empty curve and no index.
///
/// # Panics
///
/// Panics if the ranking names a node missing from `graph`, e.g. when
/// `subgroup` was cut from a different network.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(
    skip_all,
    fields(group = %subgroup.label, method = %ranker.method(), recalculate = recalculate)
)]
pub fn simulate<R: Ranker + ?Sized>(
    mut graph: LabeledGraph,
    subgroup: &Subgroup,
    ranker: &mut R,
    recalculate: bool,
) -> RemovalOutcome {
    let method = ranker.method();
    let n = subgroup.size();

    if n == 0 {
        warn!(value = %subgroup.value, "subgroup has no nodes; skipping removal");
        return RemovalOutcome {
            method,
            curve: RemovalCurve::default(),
            vulnerability: None,
            removed: Vec::new(),
        };
    }

    let mut ranking = ranker.rank(&subgroup.graph);
    let refresh = recalculate && ranker.refreshes();
    let nf = n as f64;

    let mut curve = RemovalCurve::with_capacity(n);
    curve.push(0.0, largest_component_size(&graph) as f64 / nf);

    let mut removal_sum = 0.0;
    let mut removed = Vec::with_capacity(n - 1);

    for step in 1..n {
        let Some((target, score)) = ranking.pop_front() else {
            unreachable!("ranking exhausted after {} of {} removals", step - 1, n - 1);
        };
        let node = graph.remove_node(target);
        debug!(step, node = %node.id, score, "removed node");
        removed.push(node.id);

        if refresh {
            ranking = ranker.rank(&graph);
        }

        let fraction = largest_component_size(&graph) as f64 / nf;
        curve.push(step as f64 / nf, fraction);
        removal_sum += fraction;
    }

    let vulnerability = vulnerability_index(removal_sum, n);
    info!(
        n,
        vulnerability = vulnerability.unwrap_or(f64::NAN),
        final_fraction = curve.y.last().copied().unwrap_or(0.0),
        "removal run complete"
    );

    RemovalOutcome {
        method,
        curve,
        vulnerability,
        removed,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
