//! Cost layers: named sets of directed edge costs over the node set
//!
//! A layer is either `Open` (mutable per-node adjacency, before compression) or
//! `Frozen` (a cost array parallel to the graph's shared CSR topology).

use crate::csr::CsrTopology;
use crate::error::{Error, Result};
use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// Name of the structural layer
pub const DEFAULT_COST_TYPE: &str = "";

/// Value returned for an edge that has no cost in a layer
pub const NO_COST: f32 = -1.0;

/// Marker stored in frozen alternate layers for edges without a value
pub(crate) const UNSET: f32 = f32::NAN;

pub(crate) fn is_unset(cost: f32) -> bool {
    cost.is_nan()
}

/// A directed, costed edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
    pub cost: f32,
}

/// Outgoing edges per parent, in insertion order
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    rows: Vec<Vec<(NodeId, f32)>>,
    edge_count: usize,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `parent -> child`. Returns true if the edge is new.
    ///
    /// An overwrite keeps the edge at its original position in the row.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, cost: f32) -> bool {
        if self.rows.len() <= parent.index() {
            self.rows.resize_with(parent.index() + 1, Vec::new);
        }
        let row = &mut self.rows[parent.index()];

        if let Some(slot) = row.iter_mut().find(|(c, _)| *c == child) {
            slot.1 = cost;
            return false;
        }
        row.push((child, cost));
        self.edge_count += 1;
        true
    }

    pub fn get(&self, parent: NodeId, child: NodeId) -> Option<f32> {
        self.row(parent)
            .iter()
            .find(|(c, _)| *c == child)
            .map(|(_, cost)| *cost)
    }

    /// Outgoing edges of `parent`; empty for nodes without any
    pub fn row(&self, parent: NodeId) -> &[(NodeId, f32)] {
        self.rows
            .get(parent.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of rows that have been touched; never more than the node count
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn len(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.edge_count == 0
    }
}

#[derive(Debug, Clone)]
enum LayerState {
    Open(Adjacency),
    Frozen(Vec<f32>),
}

/// A named layer of edge costs
#[derive(Debug, Clone)]
pub struct CostLayer {
    name: String,
    state: LayerState,
}

impl CostLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: LayerState::Open(Adjacency::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_default(&self) -> bool {
        self.name == DEFAULT_COST_TYPE
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.state, LayerState::Frozen(_))
    }

    /// Structural insert. Only the default layer accepts edges, and only while open.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, cost: f32) -> Result<()> {
        let is_default = self.is_default();
        match &mut self.state {
            LayerState::Open(_) if !is_default => Err(Error::NotCompressed {
                operation: "adding edges to an alternate cost type",
            }),
            LayerState::Open(adjacency) => {
                adjacency.insert(parent, child, cost);
                Ok(())
            }
            LayerState::Frozen(_) => Err(Error::AlreadyCompressed {
                operation: "add structural edges",
            }),
        }
    }

    /// Write a cost for an edge of the frozen topology
    pub fn set_cost(
        &mut self,
        topology: &CsrTopology,
        parent: NodeId,
        child: NodeId,
        cost: f32,
    ) -> Result<()> {
        let data = match &mut self.state {
            LayerState::Frozen(data) => data,
            LayerState::Open(_) => {
                return Err(Error::NotCompressed {
                    operation: "setting alternate edge costs",
                })
            }
        };

        let pos = topology
            .position(parent, child)
            .ok_or_else(|| Error::OutOfRange {
                cost_type: self.name.clone(),
                parent,
                child,
            })?;

        let len = data.len();
        let slot = data.get_mut(pos).ok_or_else(|| {
            Error::internal(format!(
                "layer '{}' holds {} values but topology position is {}",
                self.name, len, pos
            ))
        })?;
        *slot = cost;
        tracing::trace!("Set {} -> {} = {} in '{}'", parent, child, cost, self.name);
        Ok(())
    }

    /// Cost of `parent -> child`, if present and set
    pub fn cost(&self, topology: Option<&CsrTopology>, parent: NodeId, child: NodeId) -> Option<f32> {
        match &self.state {
            LayerState::Open(adjacency) => adjacency.get(parent, child),
            LayerState::Frozen(data) => topology
                .and_then(|t| t.position(parent, child))
                .and_then(|pos| data.get(pos).copied())
                .filter(|cost| !is_unset(*cost)),
        }
    }

    /// Open adjacency, if the layer is not frozen yet
    pub fn adjacency(&self) -> Option<&Adjacency> {
        match &self.state {
            LayerState::Open(adjacency) => Some(adjacency),
            LayerState::Frozen(_) => None,
        }
    }

    /// Frozen cost array, parallel to the topology's inner indices
    pub fn data(&self) -> Option<&[f32]> {
        match &self.state {
            LayerState::Frozen(data) => Some(data),
            LayerState::Open(_) => None,
        }
    }

    pub(crate) fn freeze(&mut self, data: Vec<f32>) {
        self.state = LayerState::Frozen(data);
    }

    /// Reset every frozen value to unset. Open layers have nothing to reset.
    pub(crate) fn clear(&mut self) {
        if let LayerState::Frozen(data) = &mut self.state {
            data.iter_mut().for_each(|v| *v = UNSET);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjacency_overwrite_keeps_position() {
        let mut adj = Adjacency::new();
        assert!(adj.insert(NodeId(0), NodeId(2), 1.0));
        assert!(adj.insert(NodeId(0), NodeId(1), 2.0));
        assert!(!adj.insert(NodeId(0), NodeId(2), 5.0));

        assert_eq!(adj.len(), 2);
        assert_eq!(adj.row(NodeId(0)), &[(NodeId(2), 5.0), (NodeId(1), 2.0)]);
        assert!(adj.row(NodeId(7)).is_empty());
    }

    #[test]
    fn test_alternate_layer_rejects_structural_edges() {
        let mut layer = CostLayer::new("energy");
        let err = layer.add_edge(NodeId(0), NodeId(1), 1.0).unwrap_err();
        assert!(matches!(err, Error::NotCompressed { .. }));
    }

    #[test]
    fn test_default_layer_accepts_edges_while_open() {
        let mut layer = CostLayer::new(DEFAULT_COST_TYPE);
        assert!(layer.is_default());
        layer.add_edge(NodeId(0), NodeId(1), 1.5).unwrap();
        assert_eq!(layer.cost(None, NodeId(0), NodeId(1)), Some(1.5));
        assert_eq!(layer.cost(None, NodeId(1), NodeId(0)), None);
    }

    #[test]
    fn test_set_cost_requires_frozen_layer() {
        let topology = CsrTopology::default();
        let mut layer = CostLayer::new("energy");
        let err = layer
            .set_cost(&topology, NodeId(0), NodeId(1), 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::NotCompressed { .. }));
    }

    #[test]
    fn test_frozen_layer_rejects_structural_edges() {
        let mut layer = CostLayer::new(DEFAULT_COST_TYPE);
        layer.freeze(vec![]);
        let err = layer.add_edge(NodeId(0), NodeId(1), 1.0).unwrap_err();
        assert!(matches!(err, Error::AlreadyCompressed { .. }));
    }
}
