//! treecursor CLI
//!
//! Runs every traversal strategy over a compact tree and checks they agree.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use treecursor_core::{BenchConfig, Harness, Strategy, TracingSink};

mod output;

/// treecursor - compact tree cursor benchmark
#[derive(Parser)]
#[command(name = "treecursor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Benchmark strategies and check every traversal count
    Run {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fields per node
        #[arg(long)]
        fields: Option<u32>,

        /// Nodes per field
        #[arg(long)]
        nodes: Option<u32>,

        /// Levels of nesting below the root
        #[arg(long)]
        depth: Option<u32>,

        /// Unmeasured batches per strategy
        #[arg(long)]
        warmup: Option<u32>,

        /// Measured batches per strategy
        #[arg(long)]
        batches: Option<u32>,

        /// Traversals per batch
        #[arg(long)]
        iterations: Option<u32>,

        /// Strategy to run (repeatable; default: all)
        #[arg(short, long = "strategy", value_name = "NAME")]
        strategies: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Count the nodes of one tree with a single traversal
    Count {
        /// Fields per node
        #[arg(long, default_value_t = 2)]
        fields: u32,

        /// Nodes per field
        #[arg(long, default_value_t = 5)]
        nodes: u32,

        /// Levels of nesting below the root
        #[arg(long, default_value_t = 1)]
        depth: u32,

        /// Strategy to traverse with
        #[arg(short, long, default_value = "per-step")]
        strategy: String,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Run {
            config,
            fields,
            nodes,
            depth,
            warmup,
            batches,
            iterations,
            strategies,
            format,
        } => {
            let mut config = match config {
                Some(path) => {
                    info!("Loading config from {}", path.display());
                    BenchConfig::from_file(&path).into_diagnostic()?
                }
                None => BenchConfig::default(),
            };

            if let Some(fields) = fields {
                config.fields_per_node = fields;
            }
            if let Some(nodes) = nodes {
                config.nodes_per_field = nodes;
            }
            if let Some(depth) = depth {
                config.depth = depth;
            }
            if let Some(warmup) = warmup {
                config.warmup_batches = warmup;
            }
            if let Some(batches) = batches {
                config.batches = batches;
            }
            if let Some(iterations) = iterations {
                config.iterations = iterations;
            }
            if !strategies.is_empty() {
                config.strategies = parse_strategies(&strategies)?;
            }

            run_bench(config, format)
        }
        Commands::Count {
            fields,
            nodes,
            depth,
            strategy,
        } => {
            let strategy: Strategy = strategy.parse().into_diagnostic()?;
            let config = BenchConfig::default()
                .with_shape(fields, nodes)
                .with_depth(depth)
                .with_strategies([strategy]);
            let harness = Harness::new(config).into_diagnostic()?;

            let count = harness.count_once(strategy).into_diagnostic()?;
            println!("{}", count);
            Ok(())
        }
    }
}

fn parse_strategies(names: &[String]) -> Result<Vec<Strategy>> {
    names
        .iter()
        .map(|name| name.parse::<Strategy>().into_diagnostic())
        .collect()
}

fn run_bench(config: BenchConfig, format: Format) -> Result<()> {
    let harness = Harness::new(config).into_diagnostic()?;
    let report = harness.run(&mut TracingSink).into_diagnostic()?;

    match format {
        Format::Json => output::json::output_json(&report)?,
        Format::Text => output::text::output_text(&report),
    }
    Ok(())
}
