//! Graph store: the façade owning nodes, cost layers and the compressed topology

use crate::aggregate::{AggregationEngine, CostAggregate, NodeAggregates};
use crate::csr::{self, CsrSnapshot, CsrTopology};
use crate::error::{Error, Result};
use crate::layer::{is_unset, CostLayer, Edge, DEFAULT_COST_TYPE, NO_COST, UNSET};
use crate::limits::{validate_coordinate, validate_cost, validate_cost_type};
use crate::node::{Node, NodeId, NodeRegistry, Point};
use std::collections::HashMap;

/// A spatial graph with one structural cost layer and any number of alternate ones.
///
/// The store starts open: nodes and structural edges may be added. `compress`
/// freezes the structural topology once and for all; afterwards only alternate
/// cost values may be written, and only onto edges of that topology.
#[derive(Debug, Clone)]
pub struct GraphStore {
    nodes: NodeRegistry,
    /// Layer 0 is always the structural layer
    layers: Vec<CostLayer>,
    layer_index: HashMap<String, usize>,
    /// Present once the graph is compressed
    topology: Option<CsrTopology>,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty graph
    pub fn new() -> Self {
        let mut layer_index = HashMap::new();
        layer_index.insert(DEFAULT_COST_TYPE.to_string(), 0);
        Self {
            nodes: NodeRegistry::new(),
            layers: vec![CostLayer::new(DEFAULT_COST_TYPE)],
            layer_index,
            topology: None,
        }
    }

    /// Create a graph pre-seeded with `points`, ids assigned in order
    pub fn with_nodes<P: Into<Point>>(points: impl IntoIterator<Item = P>) -> Result<Self> {
        let mut store = Self::new();
        for point in points {
            store.nodes.add_or_get(point)?;
        }
        tracing::debug!("Created graph with {} seeded nodes", store.nodes.len());
        Ok(store)
    }

    pub fn is_compressed(&self) -> bool {
        self.topology.is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nodes
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a point, returning its existing id if already present.
    ///
    /// New points are rejected once the graph is compressed.
    pub fn add_node(&mut self, point: impl Into<Point>) -> Result<NodeId> {
        let point = point.into();
        validate_coordinate(point.x, point.y, point.z)?;
        if self.is_compressed() {
            return self.nodes.get(point).ok_or(Error::AlreadyCompressed {
                operation: "add nodes",
            });
        }
        self.nodes.add_or_get(point)
    }

    /// Id of `point`, if it is a node of this graph
    pub fn node_id(&self, point: impl Into<Point>) -> Option<NodeId> {
        self.nodes.get(point)
    }

    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.node(id)
    }

    /// Snapshot of every node in id order
    pub fn nodes(&self) -> Vec<Node> {
        self.nodes.all()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of structural edges
    pub fn num_edges(&self) -> usize {
        match &self.topology {
            Some(topology) => topology.nnz(),
            None => self.layers[0].adjacency().map(|a| a.len()).unwrap_or(0),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Add a structural edge between two points, registering them as needed
    pub fn add_edge(
        &mut self,
        parent: impl Into<Point>,
        child: impl Into<Point>,
        cost: f32,
    ) -> Result<()> {
        self.add_edge_with_cost_type(parent, child, cost, DEFAULT_COST_TYPE)
    }

    /// Add an edge between two points under `cost_type`.
    ///
    /// The structural cost type registers unseen points; alternate cost types
    /// require both points to be nodes already and the graph to be compressed.
    pub fn add_edge_with_cost_type(
        &mut self,
        parent: impl Into<Point>,
        child: impl Into<Point>,
        cost: f32,
        cost_type: &str,
    ) -> Result<()> {
        let (parent, child) = (parent.into(), child.into());

        if cost_type == DEFAULT_COST_TYPE {
            self.ensure_open("add structural edges")?;
            validate_cost(cost)?;
            validate_coordinate(child.x, child.y, child.z)?;
            let parent = self.nodes.add_or_get(parent)?;
            let child = self.nodes.add_or_get(child)?;
            return self.layers[0].add_edge(parent, child, cost);
        }

        self.ensure_compressed("setting alternate edge costs")?;
        let lookup = |point: Point| {
            self.nodes.get(point).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "point ({}, {}, {}) is not a node of this graph",
                    point.x, point.y, point.z
                ))
            })
        };
        let (parent, child) = (lookup(parent)?, lookup(child)?);
        self.set_edge_cost(cost_type, parent, child, cost)
    }

    /// Add an edge between two registered node ids under `cost_type`.
    ///
    /// The structural cost type inserts or overwrites the edge; alternate cost
    /// types write a value onto an existing structural edge.
    pub fn add_edge_by_id(
        &mut self,
        parent: NodeId,
        child: NodeId,
        cost: f32,
        cost_type: &str,
    ) -> Result<()> {
        if cost_type != DEFAULT_COST_TYPE {
            return self.set_edge_cost(cost_type, parent, child, cost);
        }

        self.ensure_open("add structural edges")?;
        validate_cost(cost)?;
        for id in [parent, child] {
            if !self.nodes.contains(id) {
                return Err(Error::InvalidArgument(format!(
                    "node {} is not registered ({} nodes)",
                    id,
                    self.nodes.len()
                )));
            }
        }
        self.layers[0].add_edge(parent, child, cost)
    }

    /// Outgoing edges of `node` in `cost_type`, in insertion order
    pub fn edges_from(&self, node: NodeId, cost_type: &str) -> Result<Vec<Edge>> {
        let layer = self.layer(cost_type)?;

        if let Some(adjacency) = layer.adjacency() {
            return Ok(adjacency
                .row(node)
                .iter()
                .map(|&(child, cost)| Edge {
                    parent: node,
                    child,
                    cost,
                })
                .collect());
        }

        let (topology, data) = self.frozen(layer)?;
        let inner = topology.inner_indices();
        Ok(topology
            .row_range(node)
            .filter(|&pos| !is_unset(data[pos]))
            .map(|pos| Edge {
                parent: node,
                child: NodeId(inner[pos]),
                cost: data[pos],
            })
            .collect())
    }

    /// Every edge with a value in `cost_type`, ordered by parent then insertion
    pub fn edges(&self, cost_type: &str) -> Result<Vec<Edge>> {
        let layer = self.layer(cost_type)?;

        if layer.adjacency().is_some() {
            let mut edges = Vec::with_capacity(self.num_edges());
            for id in 0..self.nodes.len() as u32 {
                edges.extend(self.edges_from(NodeId(id), cost_type)?);
            }
            return Ok(edges);
        }

        let (topology, data) = self.frozen(layer)?;
        Ok(topology.edges(data).collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cost types
    // ─────────────────────────────────────────────────────────────────────────

    /// Names of every cost type in creation order; the structural one comes first
    pub fn cost_types(&self) -> Vec<&str> {
        self.layers.iter().map(CostLayer::name).collect()
    }

    pub fn has_cost_type(&self, cost_type: &str) -> bool {
        self.layer_index.contains_key(cost_type)
    }

    /// Create an empty alternate cost type. Existing cost types are left untouched.
    pub fn register_cost_type(&mut self, cost_type: &str) -> Result<()> {
        validate_cost_type(cost_type)?;
        self.layer_index_or_create(cost_type);
        Ok(())
    }

    /// Reset every value of an alternate cost type to unset
    pub fn clear_cost_type(&mut self, cost_type: &str) -> Result<()> {
        validate_cost_type(cost_type)?;
        let idx = self.layer_index(cost_type)?;
        self.layers[idx].clear();
        tracing::debug!("Cleared cost type '{}'", cost_type);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Compression
    // ─────────────────────────────────────────────────────────────────────────

    /// Freeze the structural topology into CSR form.
    ///
    /// Compressing an already compressed graph is a no-op.
    pub fn compress(&mut self) -> Result<()> {
        if self.is_compressed() {
            tracing::debug!("Graph already compressed, ignoring");
            return Ok(());
        }
        let topology = csr::compress(&mut self.layers, self.nodes.len())?;
        self.topology = Some(topology);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alternate costs
    // ─────────────────────────────────────────────────────────────────────────

    /// Write `cost` for `parent -> child` in an alternate cost type.
    ///
    /// The edge must exist in the structural topology. The cost type is
    /// created on first use.
    pub fn set_edge_cost(
        &mut self,
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
        let topology = self.topology.as_ref().ok_or(Error::NotCompressed {
            operation: "setting alternate edge costs",
        })?;
        validate_cost(cost)?;

        if topology.position(parent, child).is_none() {
            return Err(Error::OutOfRange {
                cost_type: cost_type.to_string(),
                parent,
                child,
            });
        }

        let idx = self.layer_index_or_create(cost_type);
        let topology = self
            .topology
            .as_ref()
            .ok_or_else(|| Error::internal("topology vanished while setting a cost"))?;
        self.layers[idx].set_cost(topology, parent, child, cost)
    }

    /// Cost of `parent -> child` in `cost_type`, or `NO_COST` if the edge has none
    pub fn get_edge_cost(&self, cost_type: &str, parent: NodeId, child: NodeId) -> Result<f32> {
        let layer = self.layer(cost_type)?;
        Ok(layer
            .cost(self.topology.as_ref(), parent, child)
            .unwrap_or(NO_COST))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export and aggregation
    // ─────────────────────────────────────────────────────────────────────────

    /// Owned CSR snapshot of `cost_type`
    pub fn export_csr(&self, cost_type: &str) -> Result<CsrSnapshot> {
        let layer = self.layer(cost_type)?;
        let (topology, data) = self.frozen_or_not_compressed(layer, "exporting CSR")?;
        Ok(CsrSnapshot::new(topology, data))
    }

    /// Aggregate `cost_type` per node; see [`AggregationEngine::execute`]
    pub fn aggregate(
        &self,
        cost_type: &str,
        kind: CostAggregate,
        directed: bool,
    ) -> Result<NodeAggregates> {
        let layer = self.layer(cost_type)?;
        let (topology, data) = self.frozen_or_not_compressed(layer, "aggregating edge costs")?;
        AggregationEngine::execute(topology, data, kind, directed)
    }

    /// Split a compressed store into its node list, topology and per-layer values
    pub(crate) fn into_frozen_parts(
        self,
    ) -> Result<(Vec<Node>, CsrTopology, Vec<(String, Vec<f32>)>)> {
        let nodes = self.nodes.all();
        let topology = self.topology.ok_or(Error::NotCompressed {
            operation: "sharing the graph",
        })?;
        let layers = self
            .layers
            .into_iter()
            .map(|layer| {
                let data = layer.data().map(<[f32]>::to_vec).ok_or_else(|| {
                    Error::internal(format!("layer '{}' is not frozen", layer.name()))
                })?;
                Ok((layer.name().to_string(), data))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok((nodes, topology, layers))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_open(&self, operation: &'static str) -> Result<()> {
        if self.is_compressed() {
            return Err(Error::AlreadyCompressed { operation });
        }
        Ok(())
    }

    fn ensure_compressed(&self, operation: &'static str) -> Result<()> {
        if !self.is_compressed() {
            return Err(Error::NotCompressed { operation });
        }
        Ok(())
    }

    fn layer_index(&self, cost_type: &str) -> Result<usize> {
        self.layer_index
            .get(cost_type)
            .copied()
            .ok_or_else(|| Error::NoSuchCostType(cost_type.to_string()))
    }

    fn layer(&self, cost_type: &str) -> Result<&CostLayer> {
        let idx = self.layer_index(cost_type)?;
        self.layers.get(idx).ok_or_else(|| {
            Error::internal(format!(
                "cost type '{}' maps to missing layer {}",
                cost_type, idx
            ))
        })
    }

    fn layer_index_or_create(&mut self, cost_type: &str) -> usize {
        if let Some(&idx) = self.layer_index.get(cost_type) {
            return idx;
        }

        let mut layer = CostLayer::new(cost_type);
        if let Some(topology) = &self.topology {
            layer.freeze(vec![UNSET; topology.nnz()]);
        }
        let idx = self.layers.len();
        self.layers.push(layer);
        self.layer_index.insert(cost_type.to_string(), idx);
        tracing::debug!("Created cost type '{}'", cost_type);
        idx
    }

    fn frozen<'a>(&'a self, layer: &'a CostLayer) -> Result<(&'a CsrTopology, &'a [f32])> {
        match (&self.topology, layer.data()) {
            (Some(topology), Some(data)) => Ok((topology, data)),
            _ => Err(Error::internal(format!(
                "layer '{}' frozen state disagrees with the graph",
                layer.name()
            ))),
        }
    }

    fn frozen_or_not_compressed<'a>(
        &'a self,
        layer: &'a CostLayer,
        operation: &'static str,
    ) -> Result<(&'a CsrTopology, &'a [f32])> {
        self.ensure_compressed(operation)?;
        self.frozen(layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Status;

    fn sample_graph() -> GraphStore {
        let mut graph =
            GraphStore::with_nodes([[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0]]).unwrap();
        graph.add_edge_by_id(NodeId(0), NodeId(1), 1.0, "").unwrap();
        graph.add_edge_by_id(NodeId(1), NodeId(2), 2.0, "").unwrap();
        graph
    }

    #[test]
    fn test_scenario_export_and_aggregate() {
        let mut graph = sample_graph();
        graph.compress().unwrap();

        let csr = graph.export_csr("").unwrap();
        assert_eq!(csr.nnz, 2);
        assert_eq!(csr.num_rows, 3);
        assert_eq!(csr.num_cols, 3);
        assert_eq!(csr.outer_indices, vec![0, 1, 2, 2]);
        assert_eq!(csr.inner_indices, vec![1, 2]);
        assert_eq!(csr.data, vec![1.0, 2.0]);

        let agg = graph.aggregate("", CostAggregate::Sum, true).unwrap();
        assert_eq!(agg.ids, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert_eq!(agg.values, vec![1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_set_edge_cost_outside_topology() {
        let mut graph = sample_graph();
        graph.compress().unwrap();

        let err = graph
            .set_edge_cost("energy", NodeId(0), NodeId(2), 5.0)
            .unwrap_err();
        assert_eq!(
            err,
            Error::OutOfRange {
                cost_type: "energy".to_string(),
                parent: NodeId(0),
                child: NodeId(2),
            }
        );
        // A rejected write does not create the cost type
        assert!(!graph.has_cost_type("energy"));
    }

    #[test]
    fn test_set_edge_cost_before_compress() {
        let mut graph = sample_graph();
        let err = graph
            .set_edge_cost("energy", NodeId(0), NodeId(1), 5.0)
            .unwrap_err();
        assert!(matches!(err, Error::NotCompressed { .. }));
    }

    #[test]
    fn test_alternate_cost_lifecycle() {
        let mut graph = sample_graph();
        graph.compress().unwrap();

        graph.set_edge_cost("energy", NodeId(1), NodeId(2), 9.5).unwrap();
        assert_eq!(graph.get_edge_cost("energy", NodeId(1), NodeId(2)).unwrap(), 9.5);
        // Edge exists structurally but has no energy value
        assert_eq!(graph.get_edge_cost("energy", NodeId(0), NodeId(1)).unwrap(), NO_COST);
        // Edge does not exist at all
        assert_eq!(graph.get_edge_cost("energy", NodeId(2), NodeId(0)).unwrap(), NO_COST);
        // Structural cost untouched
        assert_eq!(graph.get_edge_cost("", NodeId(1), NodeId(2)).unwrap(), 2.0);

        let err = graph.get_edge_cost("time", NodeId(0), NodeId(1)).unwrap_err();
        assert_eq!(err, Error::NoSuchCostType("time".to_string()));
    }

    #[test]
    fn test_compress_twice_is_noop() {
        let mut graph = sample_graph();
        graph.compress().unwrap();
        let first = graph.export_csr("").unwrap();
        graph.compress().unwrap();
        assert_eq!(graph.export_csr("").unwrap(), first);
    }

    #[test]
    fn test_structural_mutation_after_compress() {
        let mut graph = sample_graph();
        graph.compress().unwrap();

        let err = graph.add_edge([0.0, 0.0, 0.0], [5.0, 5.0, 5.0], 1.0).unwrap_err();
        assert!(matches!(err, Error::AlreadyCompressed { .. }));
        let err = graph.add_edge_by_id(NodeId(2), NodeId(0), 1.0, "").unwrap_err();
        assert!(matches!(err, Error::AlreadyCompressed { .. }));
        let err = graph.add_node([5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, Error::AlreadyCompressed { .. }));
        // Known points still resolve
        assert_eq!(graph.add_node([1.0, 0.0, 0.0]).unwrap(), NodeId(1));
        assert_eq!(graph.num_nodes(), 3);
    }

    #[test]
    fn test_add_edge_registers_points() {
        let mut graph = GraphStore::new();
        graph.add_edge([0.0, 0.0, 0.0], [0.0, 1.0, 2.0], 1.0).unwrap();
        graph.add_edge([0.0, 0.0, 0.0], [0.0, 1.0, 3.0], 2.0).unwrap();
        graph.add_edge([0.0, 1.0, 2.0], [0.0, 0.0, 0.0], 3.0).unwrap();

        assert_eq!(graph.num_nodes(), 3);
        assert_eq!(graph.num_edges(), 3);
        assert_eq!(graph.node_id([0.0, 1.0, 3.0]), Some(NodeId(2)));
        assert_eq!(graph.node_id([4.0, 4.0, 4.0]), None);
    }

    #[test]
    fn test_duplicate_edge_overwrites() {
        let mut graph = sample_graph();
        graph.add_edge_by_id(NodeId(0), NodeId(1), 7.0, "").unwrap();
        assert_eq!(graph.num_edges(), 2);
        graph.compress().unwrap();
        assert_eq!(graph.export_csr("").unwrap().data, vec![7.0, 2.0]);
    }

    #[test]
    fn test_unknown_ids_rejected() {
        let mut graph = sample_graph();
        let err = graph.add_edge_by_id(NodeId(0), NodeId(9), 1.0, "").unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_alternate_edge_by_points() {
        let mut graph = sample_graph();
        let err = graph
            .add_edge_with_cost_type([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 4.0, "energy")
            .unwrap_err();
        assert!(matches!(err, Error::NotCompressed { .. }));

        graph.compress().unwrap();
        graph
            .add_edge_with_cost_type([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 4.0, "energy")
            .unwrap();
        assert_eq!(graph.get_edge_cost("energy", NodeId(0), NodeId(1)).unwrap(), 4.0);

        let err = graph
            .add_edge_with_cost_type([0.0, 0.0, 0.0], [8.0, 8.0, 8.0], 4.0, "energy")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_registered_cost_type_frozen_on_compress() {
        let mut graph = sample_graph();
        graph.register_cost_type("time").unwrap();
        assert_eq!(graph.cost_types(), vec!["", "time"]);

        // Exists, but has no values yet
        assert_eq!(graph.get_edge_cost("time", NodeId(0), NodeId(1)).unwrap(), NO_COST);
        graph.compress().unwrap();

        let csr = graph.export_csr("time").unwrap();
        assert_eq!(csr.outer_indices, vec![0, 1, 2, 2]);
        assert!(csr.data.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_clear_cost_type() {
        let mut graph = sample_graph();
        graph.compress().unwrap();
        graph.set_edge_cost("energy", NodeId(0), NodeId(1), 3.0).unwrap();
        graph.clear_cost_type("energy").unwrap();

        assert_eq!(graph.get_edge_cost("energy", NodeId(0), NodeId(1)).unwrap(), NO_COST);
        assert!(graph.clear_cost_type("").is_err());
        assert!(matches!(
            graph.clear_cost_type("missing"),
            Err(Error::NoSuchCostType(_))
        ));
    }

    #[test]
    fn test_export_and_aggregate_require_compression() {
        let graph = sample_graph();
        assert!(matches!(
            graph.export_csr(""),
            Err(Error::NotCompressed { .. })
        ));
        assert!(matches!(
            graph.aggregate("", CostAggregate::Sum, true),
            Err(Error::NotCompressed { .. })
        ));
        assert!(matches!(
            graph.export_csr("energy"),
            Err(Error::NoSuchCostType(_))
        ));
    }

    #[test]
    fn test_edges_from_before_and_after_compress() {
        let mut graph = sample_graph();
        let before = graph.edges_from(NodeId(1), "").unwrap();
        graph.compress().unwrap();
        let after = graph.edges_from(NodeId(1), "").unwrap();

        assert_eq!(before, after);
        assert_eq!(
            after,
            vec![Edge {
                parent: NodeId(1),
                child: NodeId(2),
                cost: 2.0
            }]
        );
        assert!(graph.edges_from(NodeId(2), "").unwrap().is_empty());
    }

    #[test]
    fn test_empty_graph_compresses() {
        let mut graph = GraphStore::new();
        graph.compress().unwrap();

        let csr = graph.export_csr("").unwrap();
        assert_eq!(csr.nnz, 0);
        assert_eq!(csr.num_rows, 0);
        assert_eq!(csr.num_cols, 0);
        assert_eq!(csr.outer_indices, vec![0]);
        assert!(csr.inner_indices.is_empty());
        assert!(csr.validate().is_ok());

        let agg = graph.aggregate("", CostAggregate::Average, false).unwrap();
        assert!(agg.is_empty());
        assert!(graph.edges("").unwrap().is_empty());
    }

    #[test]
    fn test_non_finite_input_registers_nothing() {
        let mut graph = GraphStore::new();

        let err = graph
            .add_edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], f32::NAN)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = graph
            .add_edge([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], f32::INFINITY)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = graph
            .add_edge([f64::INFINITY, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = graph
            .add_edge([0.0, 0.0, 0.0], [1.0, f64::NAN, 0.0], 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        assert_eq!(graph.num_nodes(), 0);
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn test_non_finite_node_after_compress_is_invalid() {
        let mut graph = sample_graph();
        graph.compress().unwrap();

        let err = graph.add_node([f64::NAN, 0.0, 0.0]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(Status::of(&graph.add_node([f64::NAN, 0.0, 0.0])), Status::OutOfRange);
    }

    #[test]
    fn test_aggregate_alternate_skips_unset() {
        let mut graph = sample_graph();
        graph.compress().unwrap();
        graph.set_edge_cost("energy", NodeId(1), NodeId(2), 6.0).unwrap();

        let count = graph.aggregate("energy", CostAggregate::Count, false).unwrap();
        assert_eq!(count.values, vec![0.0, 1.0, 1.0]);
        assert_eq!(graph.edges("energy").unwrap().len(), 1);
    }
}
