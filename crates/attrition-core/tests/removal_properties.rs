//! Known-topology regression tests for the removal simulator.
//!
//! Expected curves and indices are derived by hand for small graphs whose
//! component structure under removal is easy to follow.

#[path = "generators.rs"]
mod generators;

use attrition_core::rank::{BetweennessRanker, DegreeRanker, RandomRanker, Ranker};
use attrition_core::{LabeledGraph, RemovalOutcome, simulate, vulnerability};
use generators::{complete, cycle, grouped, path, single_group, star, subgroup};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn run<R: Ranker>(g: &LabeledGraph, mut ranker: R, recalculate: bool) -> RemovalOutcome {
    let sub = subgroup(g, "all");
    simulate(g.clone(), &sub, &mut ranker, recalculate)
}

fn assert_non_increasing(ys: &[f64]) {
    for pair in ys.windows(2) {
        assert!(pair[1] <= pair[0], "curve increased: {ys:?}");
    }
}

// ---------------------------------------------------------------------------
// Curve shape
// ---------------------------------------------------------------------------

#[test]
fn curve_has_n_points_from_zero_to_n_minus_one_over_n() {
    for n in 1..=7 {
        let out = run(&path(n), DegreeRanker, false);
        assert_eq!(out.curve.len(), n);
        assert_eq!(out.curve.x[0], 0.0);
        #[allow(clippy::cast_precision_loss)]
        let last = (n - 1) as f64 / n as f64;
        assert!((out.curve.x[n - 1] - last).abs() < 1e-12);
        assert_eq!(out.removed.len(), n - 1);
    }
}

#[test]
fn path_of_five_sequential_attack_is_non_increasing() {
    let g = path(5);
    for out in [
        run(&g, BetweennessRanker, true),
        run(&g, DegreeRanker, true),
    ] {
        assert_non_increasing(&out.curve.y);
        assert_eq!(out.curve.y[0], 1.0);
    }
}

#[test]
fn path_of_five_betweenness_cuts_the_middle_first() {
    // 0-1-2-3-4: node 2 has the highest betweenness; two pairs remain.
    let out = run(&path(5), BetweennessRanker, false);
    assert_eq!(out.removed[0], "2");
    assert!((out.curve.y[1] - 0.4).abs() < 1e-12);
}

#[test]
fn self_loop_moves_a_node_up_the_degree_order() {
    // 0-2-1-3 with a loop on 0: degree 3 beats the two interior nodes.
    let g = single_group(4, &[(0, 2), (2, 1), (1, 3), (0, 0)]);
    let out = run(&g, DegreeRanker, false);
    assert_eq!(out.removed[0], "0");
    assert!((out.curve.y[1] - 0.75).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Complete graphs
// ---------------------------------------------------------------------------

#[test]
#[allow(clippy::cast_precision_loss)]
fn complete_graph_degree_attack_matches_closed_form() {
    // K_n stays connected: after i removals the component is (n - i) / n.
    // Index = 0.5 - (sum_{i=1}^{n-1} (n - i) / n) / n.
    for (n, expected) in [(4usize, 0.125), (5, 0.1)] {
        let out = run(&complete(n), DegreeRanker, false);
        for (i, y) in out.curve.y.iter().enumerate() {
            assert!((y - (n - i) as f64 / n as f64).abs() < 1e-12);
        }
        let v = out.vulnerability.expect("non-empty");
        assert!((v - expected).abs() < 1e-12, "K_{n}: {v}");
    }
}

#[test]
fn reported_index_matches_curve() {
    let out = run(&star(6), BetweennessRanker, true);
    let recomputed = vulnerability::from_curve(&out.curve).expect("non-empty");
    assert!((out.vulnerability.expect("non-empty") - recomputed).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// Sequential vs simultaneous
// ---------------------------------------------------------------------------

#[test]
fn recalculation_is_a_no_op_when_order_never_changes() {
    // All nodes stay tied in K_n, and a star's leaves are all tied once the
    // hub is gone, so re-ranking reproduces the fixed order.
    for g in [complete(6), star(5)] {
        let fixed = run(&g, DegreeRanker, false);
        let adaptive = run(&g, DegreeRanker, true);
        assert_eq!(fixed.curve, adaptive.curve);
        assert_eq!(fixed.removed, adaptive.removed);

        let fixed = run(&g, BetweennessRanker, false);
        let adaptive = run(&g, BetweennessRanker, true);
        assert_eq!(fixed.curve, adaptive.curve);
    }
}

#[test]
fn cycle_curves_have_equal_length_in_both_modes() {
    // Degrees on a ring tie only until the first removal; the adaptive
    // attacker then targets path interiors and fragments it faster.
    let g = cycle(6);
    let fixed = run(&g, DegreeRanker, false);
    let adaptive = run(&g, DegreeRanker, true);
    assert_eq!(fixed.curve.x, adaptive.curve.x);
    assert_eq!(fixed.curve.y[1], adaptive.curve.y[1]);
    assert!(adaptive.vulnerability >= fixed.vulnerability);
}

#[test]
fn random_order_ignores_recalculation() {
    let g = cycle(8);
    let mut rng_a = StdRng::seed_from_u64(5);
    let mut rng_b = StdRng::seed_from_u64(5);
    let fixed = run(&g, RandomRanker::new(&mut rng_a), false);
    let adaptive = run(&g, RandomRanker::new(&mut rng_b), true);
    assert_eq!(fixed, adaptive);
}

// ---------------------------------------------------------------------------
// Random vs targeted
// ---------------------------------------------------------------------------

#[test]
fn random_and_degree_removal_diverge_on_a_star() {
    let g = star(9);
    let targeted = run(&g, DegreeRanker, false);
    // Hub goes first: only singletons remain.
    assert_eq!(targeted.removed[0], "0");
    assert!((targeted.curve.y[1] - 0.1).abs() < 1e-12);

    let diverged = (0..20u64).any(|seed| {
        let mut rng = StdRng::seed_from_u64(seed);
        run(&g, RandomRanker::new(&mut rng), false).curve != targeted.curve
    });
    assert!(diverged, "random removal should not always hit the hub first");
}

// ---------------------------------------------------------------------------
// Subgroups inside a larger network
// ---------------------------------------------------------------------------

#[test]
fn subgroup_removal_measures_the_whole_network() {
    // a-a-b-b-b path. The "b" nodes are never removed but still count.
    let g = grouped(&["a", "a", "b", "b", "b"], &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    let sub = subgroup(&g, "a");
    let out = simulate(g.clone(), &sub, &mut DegreeRanker, false);
    // n = 2 and one removal. Degree tie inside the subgroup: node 0 goes first.
    assert_eq!(out.curve.x, vec![0.0, 0.5]);
    assert_eq!(out.curve.y, vec![2.5, 2.0]);
    assert_eq!(out.removed, vec!["0"]);
}

#[test]
fn sequential_attack_may_remove_nodes_outside_the_subgroup() {
    // Star hub belongs to "b"; the "a" leaves define n. Re-ranking the full
    // graph targets the hub next.
    let g = grouped(
        &["b", "a", "a", "a", "a"],
        &[(0, 1), (0, 2), (0, 3), (0, 4), (1, 2)],
    );
    let sub = subgroup(&g, "a");
    let out = simulate(g.clone(), &sub, &mut DegreeRanker, true);
    assert_eq!(out.removed[0], "1");
    assert_eq!(out.removed[1], "0");
}
