//! Edge commands

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{format_cost, format_output, Tabular};
use crate::{AppContext, Cli};
use spatialgraph_core::{Edge, NodeId};

#[derive(Args)]
pub struct EdgeArgs {
    #[command(subcommand)]
    pub command: EdgeCommands,
}

#[derive(Subcommand)]
pub enum EdgeCommands {
    /// List edges that have a value in the cost type
    List {
        /// Only edges leaving this node
        #[arg(long)]
        from: Option<u32>,
    },
    /// Print the cost of an edge, or -1 if it has none
    Cost {
        /// Parent node id
        parent: u32,
        /// Child node id
        child: u32,
    },
}

#[derive(Serialize)]
struct EdgeRow {
    parent: u32,
    child: u32,
    cost: f32,
}

impl From<Edge> for EdgeRow {
    fn from(edge: Edge) -> Self {
        Self {
            parent: edge.parent.0,
            child: edge.child.0,
            cost: edge.cost,
        }
    }
}

impl Tabular for EdgeRow {
    fn headers() -> &'static [&'static str] {
        &["parent", "child", "cost"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.parent.to_string(),
            self.child.to_string(),
            format_cost(self.cost),
        ]
    }
}

pub fn run(args: &EdgeArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let cost_type = cli.cost_type(&ctx.config);
    tracing::debug!("Running edge command for cost type '{}'", cost_type);

    match &args.command {
        EdgeCommands::List { from } => {
            let edges = match from {
                Some(node) => ctx.store.edges_from(NodeId(*node), &cost_type)?,
                None => ctx.store.edges(&cost_type)?,
            };
            let rows: Vec<EdgeRow> = edges.into_iter().map(EdgeRow::from).collect();
            println!("{}", format_output(&rows, cli.output_format(&ctx.config)));
        }
        EdgeCommands::Cost { parent, child } => {
            let cost = ctx
                .store
                .get_edge_cost(&cost_type, NodeId(*parent), NodeId(*child))?;
            println!("{}", cost);
        }
    }

    Ok(())
}
