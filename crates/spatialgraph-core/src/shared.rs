//! Thread-safe view of a compressed graph
//!
//! Topology, nodes and structural costs are immutable and shared behind `Arc`.
//! Each alternate cost type owns its values behind its own `RwLock`, so writers
//! to different cost types never wait on each other.

use crate::aggregate::{AggregationEngine, CostAggregate, NodeAggregates};
use crate::csr::{CsrSnapshot, CsrTopology};
use crate::error::{Error, Result};
use crate::layer::{is_unset, DEFAULT_COST_TYPE, NO_COST, UNSET};
use crate::limits::{validate_cost, validate_cost_type};
use crate::node::{Node, NodeId};
use crate::store::GraphStore;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type LayerValues = Arc<RwLock<Vec<f32>>>;

fn lock_error(e: impl std::fmt::Display) -> Error {
    Error::internal(format!("Lock error: {}", e))
}

/// Compressed graph shared between threads
pub struct SharedGraph {
    nodes: Arc<Vec<Node>>,
    topology: Arc<CsrTopology>,
    structural: Arc<Vec<f32>>,
    layers: RwLock<HashMap<String, LayerValues>>,
}

impl TryFrom<GraphStore> for SharedGraph {
    type Error = Error;

    fn try_from(store: GraphStore) -> Result<Self> {
        let (nodes, topology, frozen) = store.into_frozen_parts()?;

        let mut structural = None;
        let mut layers = HashMap::new();
        for (name, data) in frozen {
            if name == DEFAULT_COST_TYPE {
                structural = Some(data);
            } else {
                layers.insert(name, Arc::new(RwLock::new(data)));
            }
        }
        let structural = structural.ok_or_else(|| Error::internal("no structural layer"))?;

        tracing::debug!(
            "Sharing graph with {} nodes and {} alternate cost types",
            nodes.len(),
            layers.len()
        );
        Ok(Self {
            nodes: Arc::new(nodes),
            topology: Arc::new(topology),
            structural: Arc::new(structural),
            layers: RwLock::new(layers),
        })
    }
}

impl SharedGraph {
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn topology(&self) -> &CsrTopology {
        &self.topology
    }

    /// Names of the alternate cost types, sorted
    pub fn cost_types(&self) -> Result<Vec<String>> {
        let layers = self.layers.read().map_err(lock_error)?;
        let mut names: Vec<String> = layers.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Create an empty alternate cost type if it does not exist yet
    pub fn register_cost_type(&self, cost_type: &str) -> Result<()> {
        validate_cost_type(cost_type)?;
        self.layer_or_create(cost_type).map(|_| ())
    }

    /// Write `cost` for an edge of the structural topology in an alternate cost type
    pub fn set_edge_cost(
        &self,
        cost_type: &str,
        parent: NodeId,
        child: NodeId,
        cost: f32,
    ) -> Result<()> {
        if cost_type == DEFAULT_COST_TYPE {
            return Err(Error::InvalidArgument(
                "the structural cost type cannot be rewritten after compression".to_string(),
            ));
        }
        validate_cost_type(cost_type)?;
        validate_cost(cost)?;

        let pos = self
            .topology
            .position(parent, child)
            .ok_or_else(|| Error::OutOfRange {
                cost_type: cost_type.to_string(),
                parent,
                child,
            })?;

        let layer = self.layer_or_create(cost_type)?;
        let mut data = layer.write().map_err(lock_error)?;
        let slot = data.get_mut(pos).ok_or_else(|| {
            Error::internal(format!("position {} outside layer '{}'", pos, cost_type))
        })?;
        *slot = cost;
        Ok(())
    }

    /// Cost of `parent -> child`, or `NO_COST` if the edge has none
    pub fn get_edge_cost(&self, cost_type: &str, parent: NodeId, child: NodeId) -> Result<f32> {
        let pos = self.topology.position(parent, child);

        if cost_type == DEFAULT_COST_TYPE {
            return Ok(pos
                .and_then(|p| self.structural.get(p).copied())
                .unwrap_or(NO_COST));
        }

        let layer = self.layer(cost_type)?;
        let data = layer.read().map_err(lock_error)?;
        Ok(pos
            .and_then(|p| data.get(p).copied())
            .filter(|cost| !is_unset(*cost))
            .unwrap_or(NO_COST))
    }

    /// Owned CSR snapshot of `cost_type`
    pub fn export_csr(&self, cost_type: &str) -> Result<CsrSnapshot> {
        if cost_type == DEFAULT_COST_TYPE {
            return Ok(CsrSnapshot::new(&self.topology, &self.structural));
        }
        let layer = self.layer(cost_type)?;
        let data = layer.read().map_err(lock_error)?;
        Ok(CsrSnapshot::new(&self.topology, &data))
    }

    /// Aggregate `cost_type` per node
    pub fn aggregate(
        &self,
        cost_type: &str,
        kind: CostAggregate,
        directed: bool,
    ) -> Result<NodeAggregates> {
        if cost_type == DEFAULT_COST_TYPE {
            return AggregationEngine::execute(&self.topology, &self.structural, kind, directed);
        }
        let layer = self.layer(cost_type)?;
        let data = layer.read().map_err(lock_error)?;
        AggregationEngine::execute(&self.topology, &data, kind, directed)
    }

    fn layer(&self, cost_type: &str) -> Result<LayerValues> {
        let layers = self.layers.read().map_err(lock_error)?;
        layers
            .get(cost_type)
            .cloned()
            .ok_or_else(|| Error::NoSuchCostType(cost_type.to_string()))
    }

    fn layer_or_create(&self, cost_type: &str) -> Result<LayerValues> {
        if let Ok(layer) = self.layer(cost_type) {
            return Ok(layer);
        }
        let mut layers = self.layers.write().map_err(lock_error)?;
        let nnz = self.topology.nnz();
        let layer = layers
            .entry(cost_type.to_string())
            .or_insert_with(|| {
                tracing::debug!("Created cost type '{}'", cost_type);
                Arc::new(RwLock::new(vec![UNSET; nnz]))
            })
            .clone();
        Ok(layer)
    }
}
