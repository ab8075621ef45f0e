//! `attrition inspect`: network summary and subgroup sizes.

use std::io::{self, Write};
use std::path::PathBuf;

use attrition_core::graph::GraphStats;
use attrition_core::{load_graph, partition_all};
use clap::Args;
use serde::Serialize;

use super::resolve_config;
use crate::output::{OutputMode, kv, render, section};

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Network file (`.gml`, or node-link `.json`).
    pub infile: PathBuf,

    /// TOML file with the group attribute and groups to report.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct SubgroupSummary {
    label: String,
    value: String,
    nodes: usize,
    internal_edges: usize,
}

/// Report payload for `attrition inspect`.
#[derive(Debug, Serialize)]
struct InspectReport {
    path: String,
    group_attribute: String,
    stats: GraphStats,
    subgroups: Vec<SubgroupSummary>,
}

/// Execute `attrition inspect`.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    let graph = load_graph(&args.infile)?;
    let subgroups = partition_all(&graph, &config)?
        .into_iter()
        .map(|sub| SubgroupSummary {
            nodes: sub.size(),
            internal_edges: sub.graph.edge_count(),
            label: sub.label,
            value: sub.value,
        })
        .collect();

    let report = InspectReport {
        path: args.infile.display().to_string(),
        group_attribute: config.group_attribute,
        stats: GraphStats::from_graph(&graph),
        subgroups,
    };

    render(OutputMode::from_json_flag(args.json), &report, render_human)
}

fn render_human(report: &InspectReport, w: &mut dyn Write) -> io::Result<()> {
    let stats = &report.stats;
    section(w, &report.path)?;
    kv(w, "nodes", stats.node_count.to_string())?;
    kv(w, "edges", stats.edge_count.to_string())?;
    kv(w, "density", format!("{:.4}", stats.density))?;
    kv(w, "components", stats.component_count.to_string())?;
    kv(w, "largest component", stats.largest_component.to_string())?;
    kv(w, "isolated nodes", stats.isolated_node_count.to_string())?;
    writeln!(w)?;

    section(w, &format!("subgroups by {:?}", report.group_attribute))?;
    for sub in &report.subgroups {
        kv(
            w,
            &sub.label,
            format!("{} nodes, {} edges ({:?})", sub.nodes, sub.internal_edges, sub.value),
        )?;
    }
    Ok(())
}
