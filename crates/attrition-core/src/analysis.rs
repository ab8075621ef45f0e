//! End-to-end analysis: every configured method against every subgroup.
//!
//! ```text
//! LabeledGraph ─ partition_all ─▶ [Subgroup]
//!      │                               │
//!      └── clone per run ──▶ simulate(graph, subgroup, ranker, recalculate)
//!                                      │
//!                          ResultRow "<label><suffix>" ─▶ ResultTable
//! ```
//!
//! Columns are ordered method-major (all degree runs, then all betweenness
//! runs, ...) and group order within a method follows the configuration.

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, instrument};

use crate::config::AnalysisConfig;
use crate::graph::LabeledGraph;
use crate::partition::partition_all;
use crate::rank::{Method, ranker_for};
use crate::removal::simulate;
use crate::table::{ResultRow, ResultTable};

/// Interpret the command-line `recalculate` token.
///
/// Only `true` and `True` select a sequential attack. Anything else,
/// including `TRUE`, `1` or `yes`, selects a simultaneous attack.
#[must_use]
pub fn parse_recalculate(token: &str) -> bool {
    matches!(token, "true" | "True")
}

/// Column key for a run, e.g. `fungi` + degree → `fungideg`.
#[must_use]
pub fn column_key(group_label: &str, method: Method) -> String {
    format!("{group_label}{}", method.suffix())
}

/// Run the configured analysis on `graph`.
///
/// Each run works on its own clone of `graph`, so no subgroup's removals
/// leak into another run. The table is only returned once every run has
/// finished.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or a node lacks the
/// group attribute.
#[instrument(skip_all, fields(recalculate = recalculate))]
pub fn run_analysis(
    graph: &LabeledGraph,
    config: &AnalysisConfig,
    recalculate: bool,
) -> Result<ResultTable> {
    config.validate()?;
    let subgroups = partition_all(graph, config)?;

    let seed = config.seed.unwrap_or_else(rand::random);
    if config.methods.contains(&Method::Random) {
        info!(seed, "random removal seed");
    }
    let mut rng = StdRng::seed_from_u64(seed);

    let mut table = ResultTable::new();
    for &method in &config.methods {
        let mut method_table = ResultTable::new();
        for subgroup in &subgroups {
            let mut ranker = ranker_for(method, &mut rng);
            let outcome = simulate(graph.clone(), subgroup, ranker.as_mut(), recalculate);
            method_table.push(ResultRow::from_outcome(
                column_key(&subgroup.label, method),
                outcome,
            ))?;
        }
        table.merge(method_table)?;
    }

    info!(columns = table.len(), "analysis complete");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GroupSpec;
    use crate::graph::parse_gml;
    use std::io;
    use std::sync::{Arc, Mutex};

    const NET: &str = r#"graph [
  node [ id 1 group "fungi" ] node [ id 2 group "fungi" ] node [ id 3 group "fungi" ]
  node [ id 4 group "Bact" ] node [ id 5 group "Bact" ]
  node [ id 6 group "lipid" ]
  edge [ source 1 target 2 ] edge [ source 2 target 3 ] edge [ source 3 target 4 ]
  edge [ source 4 target 5 ] edge [ source 5 target 6 ] edge [ source 6 target 1 ]
]"#;

    #[test]
    fn recalculate_token_policy() {
        assert!(parse_recalculate("true"));
        assert!(parse_recalculate("True"));
        for other in ["TRUE", "false", "False", "1", "yes", "", " true"] {
            assert!(!parse_recalculate(other), "{other:?} must read as false");
        }
    }

    #[test]
    fn default_config_produces_method_major_columns() {
        let g = parse_gml(NET).expect("graph");
        let table = run_analysis(&g, &AnalysisConfig::default(), false).expect("analysis");
        let keys: Vec<_> = table.keys().collect();
        assert_eq!(
            keys,
            vec!["fungideg", "bactideg", "lipiddeg", "fungibet", "bactibet", "lipidbet"]
        );
        assert_eq!(table.get("fungideg").expect("column").x.len(), 3);
        assert_eq!(table.get("lipidbet").expect("column").x.len(), 1);
    }

    #[test]
    fn runs_do_not_share_removals() {
        // Every run starts from the full 6-node ring: y[0] = 6 / n.
        let g = parse_gml(NET).expect("graph");
        let table = run_analysis(&g, &AnalysisConfig::default(), false).expect("analysis");
        for (key, n) in [("fungideg", 3.0), ("bactideg", 2.0), ("lipiddeg", 1.0)] {
            let y0 = table.get(key).expect("column").y[0];
            assert!((y0 - 6.0 / n).abs() < 1e-12, "{key}: {y0}");
        }
    }

    #[test]
    fn empty_group_gives_empty_column() {
        let g = parse_gml(NET).expect("graph");
        let config = AnalysisConfig {
            groups: vec![GroupSpec::new("arch", "Archaea")],
            methods: vec![Method::Degree],
            ..AnalysisConfig::default()
        };
        let table = run_analysis(&g, &config, true).expect("analysis");
        let row = table.get("archdeg").expect("column");
        assert!(row.x.is_empty());
        assert_eq!(row.vulnerability, None);
    }

    #[test]
    fn seeded_random_runs_are_reproducible() {
        let g = parse_gml(NET).expect("graph");
        let config = AnalysisConfig {
            methods: vec![Method::Random],
            seed: Some(99),
            ..AnalysisConfig::default()
        };
        let a = run_analysis(&g, &config, false).expect("analysis");
        let b = run_analysis(&g, &config, false).expect("analysis");
        assert_eq!(a, b);
        assert!(a.get("fungirand").is_some());
    }

    /// `io::Write` sink shared with the test body.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn spans_carry_the_recalculate_flag() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .finish();

        let g = parse_gml(NET).expect("graph");
        tracing::subscriber::with_default(subscriber, || {
            run_analysis(&g, &AnalysisConfig::default(), true).expect("analysis");
        });

        let log = String::from_utf8(captured.0.lock().expect("log buffer").clone()).expect("utf8");
        assert!(log.contains("run_analysis{recalculate=true}"), "{log}");
        assert!(
            log.lines()
                .any(|line| line.contains("simulate{") && line.contains("recalculate=true}: ")),
            "{log}"
        );
    }

    #[test]
    fn missing_group_attribute_fails() {
        let g = parse_gml("graph [ node [ id 1 ] ]").expect("graph");
        assert!(run_analysis(&g, &AnalysisConfig::default(), false).is_err());
    }
}
