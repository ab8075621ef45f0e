#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use std::env;
use std::io;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "attrition: attack tolerance of attributed networks",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the removal analysis and write the result table",
        long_about = "Remove each subgroup's nodes in centrality order, track the largest \
                      connected component of the whole network, and write one column per \
                      subgroup and method.",
        after_help = "EXAMPLES:\n    # Simultaneous attack, CSV output\n    attrition run network.gml robustness.csv false\n\n    # Sequential attack with random removal added\n    attrition run network.gml robustness.json True --method degree --method random --seed 7"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Summarize a network and its subgroups",
        after_help = "EXAMPLES:\n    attrition inspect network.gml\n    attrition inspect network.json --json"
    )]
    Inspect(cmd::inspect::InspectArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ATTRITION_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "attrition=debug,info"
        } else {
            "attrition=info,warn"
        })
    });

    let format = env::var("ATTRITION_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        debug!("verbose mode enabled");
    }

    match cli.command {
        Commands::Run(ref args) => cmd::run::run_robustness(args),
        Commands::Inspect(ref args) => cmd::inspect::run_inspect(args),
    }
}
