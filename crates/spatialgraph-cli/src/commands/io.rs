//! Graph documents: loading, building and exporting

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::output::{csv_escape, format_cost};
use crate::{AppContext, Cli};
use spatialgraph_core::{Edge, GraphStore, NodeId, DEFAULT_COST_TYPE};

/// Current document version
pub const DOCUMENT_VERSION: &str = "1.0";

/// Export format
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Export format
    #[arg(long = "as", value_enum, default_value = "json")]
    pub export_format: ExportFormat,
}

/// A graph on disk: seeded nodes, structural edges and alternate costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub nodes: Vec<[f64; 3]>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
    /// Alternate cost values keyed by cost type
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub costs: BTreeMap<String, Vec<EdgeDocument>>,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub from: Endpoint,
    pub to: Endpoint,
    pub cost: f32,
}

/// An edge endpoint, either a node id or a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Id(u32),
    Point([f64; 3]),
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Point([x, y, z]) => write!(f, "({}, {}, {})", x, y, z),
        }
    }
}

impl GraphDocument {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read graph document {:?}", path))?;
        let document: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse graph document {:?}", path))?;
        tracing::debug!("Graph document version: {}", document.version);
        Ok(document)
    }

    /// Build and compress a graph.
    ///
    /// Points used as structural endpoints are registered on the fly; cost
    /// endpoints must name existing nodes and edges.
    pub fn build(&self) -> anyhow::Result<GraphStore> {
        let mut store = GraphStore::with_nodes(self.nodes.iter().copied())?;

        for (i, edge) in self.edges.iter().enumerate() {
            let add = |store: &mut GraphStore| -> anyhow::Result<()> {
                let parent = register(store, edge.from)?;
                let child = register(store, edge.to)?;
                store.add_edge_by_id(parent, child, edge.cost, DEFAULT_COST_TYPE)?;
                Ok(())
            };
            add(&mut store)
                .with_context(|| format!("edge #{} ({} -> {})", i, edge.from, edge.to))?;
        }

        for name in self.costs.keys() {
            store.register_cost_type(name)?;
        }
        store.compress()?;

        for (name, edges) in &self.costs {
            for edge in edges {
                let parent = resolve(&store, edge.from)?;
                let child = resolve(&store, edge.to)?;
                store
                    .set_edge_cost(name, parent, child, edge.cost)
                    .with_context(|| {
                        format!("cost type '{}' ({} -> {})", name, edge.from, edge.to)
                    })?;
            }
        }

        tracing::info!(
            "Built graph with {} nodes, {} edges and {} alternate cost types",
            store.num_nodes(),
            store.num_edges(),
            self.costs.len()
        );
        Ok(store)
    }

    /// Document describing every node, structural edge and alternate cost of `store`
    pub fn from_store(store: &GraphStore) -> anyhow::Result<Self> {
        let to_documents = |edges: Vec<Edge>| -> Vec<EdgeDocument> {
            edges
                .into_iter()
                .map(|e| EdgeDocument {
                    from: Endpoint::Id(e.parent.0),
                    to: Endpoint::Id(e.child.0),
                    cost: e.cost,
                })
                .collect()
        };

        let mut costs = BTreeMap::new();
        for name in store.cost_types() {
            if name != DEFAULT_COST_TYPE {
                costs.insert(name.to_string(), to_documents(store.edges(name)?));
            }
        }

        Ok(Self {
            version: default_version(),
            nodes: store
                .nodes()
                .iter()
                .map(|n| [n.x, n.y, n.z])
                .collect(),
            edges: to_documents(store.edges(DEFAULT_COST_TYPE)?),
            costs,
        })
    }
}

fn register(store: &mut GraphStore, endpoint: Endpoint) -> anyhow::Result<NodeId> {
    match endpoint {
        Endpoint::Id(id) => Ok(NodeId(id)),
        Endpoint::Point(point) => Ok(store.add_node(point)?),
    }
}

fn resolve(store: &GraphStore, endpoint: Endpoint) -> anyhow::Result<NodeId> {
    match endpoint {
        Endpoint::Id(id) => Ok(NodeId(id)),
        Endpoint::Point(point) => store
            .node_id(point)
            .ok_or_else(|| anyhow::anyhow!("point {} is not a node of this graph", endpoint)),
    }
}

/// Load and build the graph document at `path`
pub fn load_graph(path: &Path) -> anyhow::Result<GraphStore> {
    tracing::info!("Loading graph from {:?}", path);
    GraphDocument::read(path)?
        .build()
        .with_context(|| format!("Invalid graph document {:?}", path))
}

pub fn run_export(args: &ExportArgs, _cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    tracing::info!("Exporting graph");

    let document = GraphDocument::from_store(&ctx.store)?;
    let content = match args.export_format {
        ExportFormat::Json => serde_json::to_string_pretty(&document)?,
        ExportFormat::Csv => export_to_csv(&document),
    };

    if let Some(ref path) = args.output {
        // Owner read/write only
        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }
        #[cfg(not(unix))]
        {
            std::fs::write(path, &content)?;
        }
        println!("Exported to {:?}", path);
    } else {
        println!("{}", content);
    }

    Ok(())
}

fn export_to_csv(document: &GraphDocument) -> String {
    let mut output = String::new();

    output.push_str("# Nodes\n");
    output.push_str("id,x,y,z\n");
    for (id, [x, y, z]) in document.nodes.iter().enumerate() {
        output.push_str(&format!("{},{},{},{}\n", id, x, y, z));
    }

    output.push_str("\n# Edges\n");
    output.push_str("cost_type,parent,child,cost\n");
    let layers = std::iter::once((DEFAULT_COST_TYPE, &document.edges))
        .chain(document.costs.iter().map(|(name, edges)| (name.as_str(), edges)));
    for (name, edges) in layers {
        for edge in edges {
            output.push_str(&format!(
                "{},{},{},{}\n",
                csv_escape(name),
                edge.from,
                edge.to,
                format_cost(edge.cost)
            ));
        }
    }

    output
}
