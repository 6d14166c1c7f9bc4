//! Whole-graph queries: summary, CSR export and aggregation

use clap::Args;
use serde::Serialize;

use crate::output::{format_cost, format_output, OutputFormat, Tabular};
use crate::{AppContext, Cli};
use spatialgraph_core::{CostAggregate, CsrSnapshot};

#[derive(Args)]
pub struct AggregateArgs {
    /// Aggregate to compute (defaults to the configured one)
    #[arg(short, long, value_enum, ignore_case = true)]
    pub kind: Option<CostAggregate>,

    /// Include incoming edges
    #[arg(long, conflicts_with = "directed")]
    pub undirected: bool,

    /// Outgoing edges only
    #[arg(long)]
    pub directed: bool,
}

#[derive(Serialize)]
struct GraphInfo {
    nodes: usize,
    edges: usize,
    compressed: bool,
    cost_types: Vec<String>,
}

#[derive(Serialize)]
struct Field {
    key: &'static str,
    value: String,
}

impl Tabular for Field {
    fn headers() -> &'static [&'static str] {
        &["key", "value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.key.to_string(), self.value.clone()]
    }
}

/// One non-zero of a CSR matrix, as a coordinate triplet
#[derive(Serialize)]
struct Triplet {
    row: usize,
    col: u32,
    value: f32,
}

impl Tabular for Triplet {
    fn headers() -> &'static [&'static str] {
        &["row", "col", "value"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.row.to_string(),
            self.col.to_string(),
            format_cost(self.value),
        ]
    }
}

#[derive(Serialize)]
struct AggregateRow {
    id: u32,
    value: f32,
}

impl Tabular for AggregateRow {
    fn headers() -> &'static [&'static str] {
        &["id", "value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.value.to_string()]
    }
}

fn join<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run_info(cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let info = GraphInfo {
        nodes: ctx.store.num_nodes(),
        edges: ctx.store.num_edges(),
        compressed: ctx.store.is_compressed(),
        cost_types: ctx
            .store
            .cost_types()
            .into_iter()
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
    };

    match cli.output_format(&ctx.config) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        format => {
            let fields = vec![
                Field {
                    key: "nodes",
                    value: info.nodes.to_string(),
                },
                Field {
                    key: "edges",
                    value: info.edges.to_string(),
                },
                Field {
                    key: "compressed",
                    value: info.compressed.to_string(),
                },
                Field {
                    key: "cost_types",
                    value: info.cost_types.join(" "),
                },
            ];
            println!("{}", format_output(&fields, format));
        }
    }
    Ok(())
}

pub fn run_csr(cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let cost_type = cli.cost_type(&ctx.config);
    let csr = ctx.store.export_csr(&cost_type)?;
    csr.validate()?;
    tracing::debug!("Exported CSR for '{}' with {} non-zeros", cost_type, csr.nnz);

    match cli.output_format(&ctx.config) {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&csr)?),
        OutputFormat::Csv => println!("{}", format_output(&triplets(&csr), OutputFormat::Csv)),
        OutputFormat::Table => {
            let data: Vec<String> = csr.data.iter().map(|&c| format_cost(c)).collect();
            let fields = vec![
                Field {
                    key: "nnz",
                    value: csr.nnz.to_string(),
                },
                Field {
                    key: "num_rows",
                    value: csr.num_rows.to_string(),
                },
                Field {
                    key: "num_cols",
                    value: csr.num_cols.to_string(),
                },
                Field {
                    key: "outer_indices",
                    value: join(&csr.outer_indices),
                },
                Field {
                    key: "inner_indices",
                    value: join(&csr.inner_indices),
                },
                Field {
                    key: "data",
                    value: data.join(" "),
                },
            ];
            println!("{}", format_output(&fields, OutputFormat::Table));
        }
    }
    Ok(())
}

fn triplets(csr: &CsrSnapshot) -> Vec<Triplet> {
    (0..csr.num_rows)
        .flat_map(move |row| {
            csr.row(row).map(move |(col, value)| Triplet {
                row,
                col: col.0,
                value,
            })
        })
        .collect()
}

pub fn run_aggregate(args: &AggregateArgs, cli: &Cli, ctx: &AppContext) -> anyhow::Result<()> {
    let cost_type = cli.cost_type(&ctx.config);
    let kind = args.kind.unwrap_or(ctx.config.aggregate);
    let directed = if args.undirected {
        false
    } else {
        args.directed || ctx.config.directed
    };

    tracing::info!(
        "Aggregating '{}' with {} ({})",
        cost_type,
        kind,
        if directed { "directed" } else { "undirected" }
    );
    let result = ctx.store.aggregate(&cost_type, kind, directed)?;

    let rows: Vec<AggregateRow> = result
        .iter()
        .map(|(id, value)| AggregateRow { id: id.0, value })
        .collect();
    println!("{}", format_output(&rows, cli.output_format(&ctx.config)));
    Ok(())
}
