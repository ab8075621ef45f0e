#![allow(dead_code)]
//! Graph builders shared by the integration tests.

use std::collections::BTreeMap;

use attrition_core::graph::{AttrValue, LabeledGraph};
use attrition_core::{GroupSpec, Subgroup, partition};
use proptest::prelude::*;

/// Build a graph whose nodes `0..n` carry `group = groups[i]`.
pub fn grouped(groups: &[&str], edges: &[(usize, usize)]) -> LabeledGraph {
    let mut g = LabeledGraph::new();
    for (i, group) in groups.iter().enumerate() {
        let attrs = BTreeMap::from([("group".to_string(), AttrValue::Str((*group).to_string()))]);
        g.add_node(i.to_string(), attrs).expect("node");
    }
    for (a, b) in edges {
        g.add_edge(&a.to_string(), &b.to_string()).expect("edge");
    }
    g
}

/// Every node in group "all".
pub fn single_group(n: usize, edges: &[(usize, usize)]) -> LabeledGraph {
    grouped(&vec!["all"; n], edges)
}

pub fn complete(n: usize) -> LabeledGraph {
    let edges: Vec<_> = (0..n)
        .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
        .collect();
    single_group(n, &edges)
}

pub fn path(n: usize) -> LabeledGraph {
    let edges: Vec<_> = (1..n).map(|i| (i - 1, i)).collect();
    single_group(n, &edges)
}

pub fn cycle(n: usize) -> LabeledGraph {
    let edges: Vec<_> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    single_group(n, &edges)
}

/// Node 0 is the hub.
pub fn star(leaves: usize) -> LabeledGraph {
    let edges: Vec<_> = (1..=leaves).map(|i| (0, i)).collect();
    single_group(leaves + 1, &edges)
}

pub fn subgroup(g: &LabeledGraph, value: &str) -> Subgroup {
    partition(g, "group", &GroupSpec::new(value, value)).expect("partition")
}

/// Random graph of 1..16 nodes split between groups "a" and "b".
pub fn arb_grouped_graph() -> impl Strategy<Value = LabeledGraph> {
    (1usize..16)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(any::<bool>(), n),
                prop::collection::vec((0..n, 0..n), 0..40),
            )
        })
        .prop_map(|(membership, edges)| {
            let groups: Vec<&str> = membership
                .iter()
                .map(|&in_a| if in_a { "a" } else { "b" })
                .collect();
            grouped(&groups, &edges)
        })
}
