//! Per-node aggregation of edge costs over a frozen layer

use crate::csr::CsrTopology;
use crate::error::{Error, Result};
use crate::layer::is_unset;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// How a node's incident edge costs are summarised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CostAggregate {
    Sum,
    #[cfg_attr(feature = "clap", value(alias = "avg", alias = "mean"))]
    Average,
    Count,
    Min,
    Max,
}

impl CostAggregate {
    pub const ALL: [CostAggregate; 5] = [
        CostAggregate::Sum,
        CostAggregate::Average,
        CostAggregate::Count,
        CostAggregate::Min,
        CostAggregate::Max,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Count => "count",
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl std::fmt::Display for CostAggregate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CostAggregate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "average" | "avg" | "mean" => Ok(Self::Average),
            "count" => Ok(Self::Count),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(Error::InvalidArgument(format!(
                "unknown aggregate '{}', expected one of sum, average, count, min, max",
                other
            ))),
        }
    }
}

/// One aggregate value per node, aligned with ascending node ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeAggregates {
    pub ids: Vec<NodeId>,
    pub values: Vec<f32>,
}

impl NodeAggregates {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<f32> {
        self.values.get(id.index()).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f32)> + '_ {
        self.ids.iter().copied().zip(self.values.iter().copied())
    }
}

#[derive(Clone, Copy)]
struct Accumulator {
    sum: f64,
    count: u32,
    min: f32,
    max: f32,
}

impl Default for Accumulator {
    fn default() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
        }
    }
}

impl Accumulator {
    fn push(&mut self, cost: f32) {
        self.sum += cost as f64;
        self.count += 1;
        self.min = self.min.min(cost);
        self.max = self.max.max(cost);
    }

    /// Nodes without contributing edges report 0 for every aggregate
    fn finish(&self, kind: CostAggregate) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        match kind {
            CostAggregate::Sum => self.sum as f32,
            CostAggregate::Average => (self.sum / self.count as f64) as f32,
            CostAggregate::Count => self.count as f32,
            CostAggregate::Min => self.min,
            CostAggregate::Max => self.max,
        }
    }
}

/// Cost aggregation engine
pub struct AggregationEngine;

impl AggregationEngine {
    /// Aggregate a layer's costs per node.
    ///
    /// Directed aggregation uses outgoing edges only; undirected aggregation
    /// credits every edge to both of its endpoints (a self loop counts twice).
    /// Unset slots of alternate layers do not contribute.
    pub fn execute(
        topology: &CsrTopology,
        data: &[f32],
        kind: CostAggregate,
        directed: bool,
    ) -> Result<NodeAggregates> {
        if data.len() != topology.nnz() {
            return Err(Error::internal(format!(
                "layer holds {} values for {} non-zeros",
                data.len(),
                topology.nnz()
            )));
        }

        let num_rows = topology.num_rows();
        let inner = topology.inner_indices();
        let mut acc = vec![Accumulator::default(); num_rows];

        for row in 0..num_rows {
            for pos in topology.row_range(NodeId(row as u32)) {
                let cost = data[pos];
                if is_unset(cost) {
                    continue;
                }
                acc[row].push(cost);
                if !directed {
                    let child = inner[pos] as usize;
                    let slot = acc.get_mut(child).ok_or_else(|| {
                        Error::internal(format!("column {} outside {} rows", child, num_rows))
                    })?;
                    slot.push(cost);
                }
            }
        }

        tracing::debug!(
            "Aggregated {} nodes with {} (directed={})",
            num_rows,
            kind,
            directed
        );

        Ok(NodeAggregates {
            ids: (0..num_rows as u32).map(NodeId).collect(),
            values: acc.iter().map(|a| a.finish(kind)).collect(),
        })
    }
}
