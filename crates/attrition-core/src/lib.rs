#![forbid(unsafe_code)]
//! attrition-core library.
//!
//! Attack-tolerance analysis for attributed networks: load a graph, split it
//! into subgroups by a node attribute, remove each subgroup's nodes in
//! centrality (or random) order, and record how the largest connected
//! component of the whole network shrinks.
//!
//! # Conventions
//!
//! - **Errors**: `thiserror` enums for graph and table errors, `anyhow::Result`
//!   at file and analysis boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!
//! # Example
//!
//! ```rust,ignore
//! use attrition_core::{AnalysisConfig, graph::load_graph, run_analysis, table::TableFormat};
//!
//! let graph = load_graph(Path::new("network.gml"))?;
//! let table = run_analysis(&graph, &AnalysisConfig::default(), true)?;
//! table.export(Path::new("robustness.csv"), TableFormat::Csv)?;
//! ```

pub mod analysis;
pub mod config;
pub mod error;
pub mod graph;
pub mod partition;
pub mod rank;
pub mod removal;
pub mod table;
pub mod vulnerability;

pub use analysis::{column_key, parse_recalculate, run_analysis};
pub use config::{AnalysisConfig, GroupSpec, load_config};
pub use error::{GraphError, TableError};
pub use graph::{LabeledGraph, load_graph};
pub use partition::{Subgroup, partition, partition_all};
pub use rank::{Method, Ranker, Ranking};
pub use removal::{RemovalCurve, RemovalOutcome, simulate};
pub use table::{ResultRow, ResultTable, TableFormat};
