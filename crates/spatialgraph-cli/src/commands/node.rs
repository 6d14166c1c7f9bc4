//! Node commands

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::output::{format_output, Tabular};
use crate::{AppContext, Cli};
use spatialgraph_core::{Node, NodeId};

#[derive(Args)]
pub struct NodeArgs {
    #[command(subcommand)]
    pub command: NodeCommands,
}

#[derive(Subcommand)]
pub enum NodeCommands {
    /// List every node in id order
    List,
    /// Print the id of a point, or -1 if it is not a node
    Id {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
    },
    /// Show a single node
    Show {
        /// Node id
        id: u32,
    },
}

#[derive(Serialize)]
struct NodeRow {
    id: u32,
    x: f64,
    y: f64,
    z: f64,
}

impl From<Node> for NodeRow {
    fn from(node: Node) -> Self {
        Self {
            id: node.id.0,
            x: node.x,
            y: node.y,
            z: node.z,
        }
    }
}

impl Tabular for NodeRow {
    fn headers() -> &'static [&'static str] {
        &["id", "x", "y", "z"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.x.to_string(),
            self.y.to_string(),
            self.z.to_string(),
        ]
    }
}

pub fn run(args: &NodeArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let format = cli.output_format(&ctx.config);

    match &args.command {
        NodeCommands::List => {
            let rows: Vec<NodeRow> = ctx.store.nodes().into_iter().map(NodeRow::from).collect();
            println!("{}", format_output(&rows, format));
        }
        NodeCommands::Id { x, y, z } => {
            let id = ctx
                .store
                .node_id([*x, *y, *z])
                .map(|id| i64::from(id.0))
                .unwrap_or(-1);
            println!("{}", id);
        }
        NodeCommands::Show { id } => match ctx.store.node(NodeId(*id)) {
            Some(node) => println!("{}", format_output(&[NodeRow::from(node)], format)),
            None => anyhow::bail!(
                "Node {} not found ({} nodes in graph)",
                id,
                ctx.store.num_nodes()
            ),
        },
    }

    Ok(())
}
