//! Node types and the point-deduplicating node registry

use crate::error::Result;
use crate::limits::{validate_coordinate, validate_node_count};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Stable, insertion-ordered node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Position of this node in id-ordered arrays
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Exact-equality lookup key. `-0.0` and `0.0` collapse to the same key.
    fn key(&self) -> [u64; 3] {
        [bits(self.x), bits(self.y), bits(self.z)]
    }
}

fn bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

/// A registered point with its id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Node {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y, self.z)
    }
}

/// Deduplicates points into sequential node ids
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    points: Vec<Point>,
    index: HashMap<[u64; 3], NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the id of `point`, registering it under the next id if unseen
    pub fn add_or_get(&mut self, point: impl Into<Point>) -> Result<NodeId> {
        let point = point.into();
        validate_coordinate(point.x, point.y, point.z)?;

        if let Some(&id) = self.index.get(&point.key()) {
            return Ok(id);
        }

        validate_node_count(self.points.len() + 1)?;
        let id = NodeId(self.points.len() as u32);
        self.index.insert(point.key(), id);
        self.points.push(point);
        tracing::trace!("Registered node {} at {:?}", id, point);
        Ok(id)
    }

    /// Id of an already registered point
    pub fn get(&self, point: impl Into<Point>) -> Option<NodeId> {
        self.index.get(&point.into().key()).copied()
    }

    /// Node registered under `id`
    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.points.get(id.index()).map(|p| Node {
            id,
            x: p.x,
            y: p.y,
            z: p.z,
        })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.points.len()
    }

    /// Snapshot of every node in id order
    pub fn all(&self) -> Vec<Node> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| Node {
                id: NodeId(i as u32),
                x: p.x,
                y: p.y,
                z: p.z,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
