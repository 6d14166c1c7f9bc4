//! Spatialgraph Core - Graph engine for spatial analysis
//!
//! Nodes are points in 3D space; directed edges carry one cost per named cost
//! type. A graph is built incrementally, compressed once into CSR form, and then
//! queried, exported and extended with alternate costs over the frozen topology.

pub mod aggregate;
pub mod csr;
pub mod error;
pub mod layer;
pub mod limits;
pub mod node;
pub mod shared;
pub mod store;

pub use aggregate::{AggregationEngine, CostAggregate, NodeAggregates};
pub use csr::{CsrSnapshot, CsrTopology};
pub use error::{Error, Result, Status};
pub use layer::{Adjacency, CostLayer, Edge, DEFAULT_COST_TYPE, NO_COST};
pub use node::{Node, NodeId, NodeRegistry, Point};
pub use shared::SharedGraph;
pub use store::GraphStore;
