//! Spatialgraph CLI - Command line interface for the spatial graph engine

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{edge, io, node, query};
use config::Config;
use output::OutputFormat;
use spatialgraph_core::GraphStore;

#[derive(Parser)]
#[command(name = "spatialgraph")]
#[command(author, version, about = "Spatial graph engine with multi-cost edges")]
pub struct Cli {
    /// Graph document (JSON)
    #[arg(short, long, global = true, env = "SPATIALGRAPH_GRAPH")]
    pub graph: Option<PathBuf>,

    /// Cost type to query (empty for the structural costs)
    #[arg(short = 't', long, global = true)]
    pub cost_type: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, global = true, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format from `--format`, then the config file
    pub fn output_format(&self, config: &Config) -> OutputFormat {
        self.format.unwrap_or(config.format)
    }

    /// Cost type from `--cost-type`, then the config file
    pub fn cost_type(&self, config: &Config) -> String {
        self.cost_type
            .clone()
            .unwrap_or_else(|| config.cost_type.clone())
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarise the graph
    Info,
    /// Query nodes
    Node(node::NodeArgs),
    /// Query edges and edge costs
    Edge(edge::EdgeArgs),
    /// Print the CSR arrays of a cost type
    Csr,
    /// Aggregate edge costs per node
    Aggregate(query::AggregateArgs),
    /// Export the graph as a document or edge list
    Export(io::ExportArgs),
    /// Manage configuration
    Config(commands::config::ConfigArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Application context with the loaded graph
pub struct AppContext {
    pub config: Config,
    pub store: GraphStore,
}

impl AppContext {
    pub fn new(cli: &Cli) -> anyhow::Result<Self> {
        let config = Config::load();
        let path = cli.graph.as_ref().ok_or_else(|| {
            anyhow::anyhow!("No graph document given. Pass --graph <FILE> or set SPATIALGRAPH_GRAPH.")
        })?;

        let store = io::load_graph(path)?;
        Ok(Self { config, store })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    tracing::debug!("Starting spatialgraph CLI");

    match &cli.command {
        Commands::Config(args) => return commands::config::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "spatialgraph",
                &mut std::io::stdout(),
            );
            return Ok(());
        }
        _ => {}
    }

    let ctx = AppContext::new(&cli)?;

    match &cli.command {
        Commands::Info => query::run_info(&cli, &ctx)?,
        Commands::Node(args) => node::run(args, &cli, &ctx)?,
        Commands::Edge(args) => edge::run(args, &cli, &ctx)?,
        Commands::Csr => query::run_csr(&cli, &ctx)?,
        Commands::Aggregate(args) => query::run_aggregate(args, &cli, &ctx)?,
        Commands::Export(args) => io::run_export(args, &cli, &ctx)?,
        Commands::Config(_) | Commands::Completions { .. } => {}
    }

    Ok(())
}
