//! Compressed sparse row topology, compression and CSR snapshots
//!
//! Compression freezes the structural layer's adjacency into a CSR triple.
//! Every layer of the graph shares the resulting `outer`/`inner` arrays; a
//! layer only owns its `data` array, so an alternate layer can never hold an
//! edge the structural layer does not have.

use crate::error::{Error, Result};
use crate::layer::{is_unset, Adjacency, CostLayer, Edge, UNSET};
use crate::limits::validate_edge_count;
use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Row offsets and column ids of the frozen structural layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrTopology {
    /// Row-start offsets, length = num_rows + 1
    outer: Vec<u32>,
    /// Column id of each non-zero, grouped by row in insertion order
    inner: Vec<u32>,
}

impl Default for CsrTopology {
    fn default() -> Self {
        Self {
            outer: vec![0],
            inner: Vec::new(),
        }
    }
}

impl CsrTopology {
    /// Build the topology and structural costs from an adjacency over `num_rows` nodes
    pub fn from_adjacency(adjacency: &Adjacency, num_rows: usize) -> Result<(Self, Vec<f32>)> {
        if adjacency.num_rows() > num_rows {
            return Err(Error::internal(format!(
                "adjacency has {} rows but only {} nodes are registered",
                adjacency.num_rows(),
                num_rows
            )));
        }
        validate_edge_count(adjacency.len())?;

        let mut outer = Vec::with_capacity(num_rows + 1);
        let mut inner = Vec::with_capacity(adjacency.len());
        let mut data = Vec::with_capacity(adjacency.len());
        outer.push(0u32);

        for row in 0..num_rows {
            for &(child, cost) in adjacency.row(NodeId(row as u32)) {
                if child.index() >= num_rows {
                    return Err(Error::internal(format!(
                        "edge {} -> {} references an unregistered node",
                        row, child
                    )));
                }
                inner.push(child.0);
                data.push(cost);
            }
            outer.push(inner.len() as u32);
        }

        Ok((Self { outer, inner }, data))
    }

    pub fn num_rows(&self) -> usize {
        self.outer.len() - 1
    }

    pub fn nnz(&self) -> usize {
        self.inner.len()
    }

    /// Positions of `row`'s edges in the inner/data arrays
    pub fn row_range(&self, row: NodeId) -> Range<usize> {
        match (self.outer.get(row.index()), self.outer.get(row.index() + 1)) {
            (Some(&start), Some(&end)) => start as usize..end as usize,
            _ => 0..0,
        }
    }

    /// Column ids of `row`'s edges in insertion order
    pub fn columns(&self, row: NodeId) -> &[u32] {
        &self.inner[self.row_range(row)]
    }

    /// Position of `parent -> child` in the inner/data arrays.
    ///
    /// Rows are short, so this is a linear scan of the parent's row.
    pub fn position(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        let range = self.row_range(parent);
        let start = range.start;
        self.inner[range]
            .iter()
            .position(|&c| c == child.0)
            .map(|offset| start + offset)
    }

    pub fn outer_indices(&self) -> &[u32] {
        &self.outer
    }

    pub fn inner_indices(&self) -> &[u32] {
        &self.inner
    }

    /// Every edge of a layer whose values run parallel to this topology.
    /// Unset slots are skipped.
    pub fn edges<'a>(&'a self, data: &'a [f32]) -> impl Iterator<Item = Edge> + 'a {
        (0..self.num_rows()).flat_map(move |row| {
            let parent = NodeId(row as u32);
            self.row_range(parent)
                .filter(move |&pos| !is_unset(data[pos]))
                .map(move |pos| Edge {
                    parent,
                    child: NodeId(self.inner[pos]),
                    cost: data[pos],
                })
        })
    }
}

/// Freeze every layer. The first layer must be the structural one.
///
/// Returns the shared topology; the structural layer keeps its costs and every
/// alternate layer is initialised with unset values over the same topology.
pub(crate) fn compress(layers: &mut [CostLayer], num_nodes: usize) -> Result<CsrTopology> {
    let (structural, alternates) = layers
        .split_first_mut()
        .ok_or_else(|| Error::internal("graph has no structural layer"))?;

    if !structural.is_default() {
        return Err(Error::internal(format!(
            "first layer is '{}', expected the structural layer",
            structural.name()
        )));
    }

    let adjacency = structural
        .adjacency()
        .ok_or_else(|| Error::internal("structural layer frozen before compression"))?;
    let (topology, data) = CsrTopology::from_adjacency(adjacency, num_nodes)?;
    structural.freeze(data);

    for layer in alternates.iter_mut().filter(|l| !l.is_frozen()) {
        layer.freeze(vec![UNSET; topology.nnz()]);
    }

    tracing::debug!(
        "Compressed graph: {} rows, {} non-zeros, {} alternate cost types",
        topology.num_rows(),
        topology.nnz(),
        alternates.len()
    );
    Ok(topology)
}

/// Owned CSR view of one cost layer.
///
/// `num_rows == num_cols == node count`. Unset slots of alternate layers are NaN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrSnapshot {
    pub nnz: usize,
    pub num_rows: usize,
    pub num_cols: usize,
    pub data: Vec<f32>,
    pub inner_indices: Vec<u32>,
    pub outer_indices: Vec<u32>,
}

impl CsrSnapshot {
    pub(crate) fn new(topology: &CsrTopology, data: &[f32]) -> Self {
        Self {
            nnz: topology.nnz(),
            num_rows: topology.num_rows(),
            num_cols: topology.num_rows(),
            data: data.to_vec(),
            inner_indices: topology.inner.clone(),
            outer_indices: topology.outer.clone(),
        }
    }

    /// `(child, cost)` pairs of `row` in insertion order
    pub fn row(&self, row: usize) -> impl Iterator<Item = (NodeId, f32)> + '_ {
        let range = match (self.outer_indices.get(row), self.outer_indices.get(row + 1)) {
            (Some(&start), Some(&end)) => start as usize..end as usize,
            _ => 0..0,
        };
        let columns = self.inner_indices.get(range.clone()).unwrap_or(&[]);
        let costs = self.data.get(range).unwrap_or(&[]);
        columns
            .iter()
            .zip(costs)
            .map(|(&c, &cost)| (NodeId(c), cost))
    }

    /// Enumerate the edges of the snapshot, skipping unset slots
    pub fn edges(&self) -> Vec<Edge> {
        (0..self.num_rows)
            .flat_map(move |row| {
                self.row(row)
                    .filter(|(_, cost)| !is_unset(*cost))
                    .map(move |(child, cost)| Edge {
                        parent: NodeId(row as u32),
                        child,
                        cost,
                    })
            })
            .collect()
    }

    /// Check the structural invariants of a CSR triple
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::InvalidArgument(msg));

        if self.num_rows != self.num_cols {
            return fail(format!(
                "matrix is not square: {} x {}",
                self.num_rows, self.num_cols
            ));
        }
        if self.outer_indices.len() != self.num_rows + 1 {
            return fail(format!(
                "outer_indices has {} entries, expected {}",
                self.outer_indices.len(),
                self.num_rows + 1
            ));
        }
        if self.inner_indices.len() != self.nnz || self.data.len() != self.nnz {
            return fail(format!(
                "inner_indices ({}) and data ({}) must both hold nnz = {} entries",
                self.inner_indices.len(),
                self.data.len(),
                self.nnz
            ));
        }
        if self.outer_indices.first() != Some(&0)
            || self.outer_indices.last().map(|&n| n as usize) != Some(self.nnz)
        {
            return fail("outer_indices must start at 0 and end at nnz".to_string());
        }
        if self.outer_indices.windows(2).any(|w| w[0] > w[1]) {
            return fail("outer_indices must be non-decreasing".to_string());
        }
        if let Some(&col) = self
            .inner_indices
            .iter()
            .find(|&&c| c as usize >= self.num_cols)
        {
            return fail(format!(
                "column {} is outside {} columns",
                col, self.num_cols
            ));
        }
        Ok(())
    }
}
