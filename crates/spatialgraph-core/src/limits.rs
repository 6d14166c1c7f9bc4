//! Input validation limits for coordinates, costs and cost type names

/// Maximum length for a cost type name (256 bytes)
pub const MAX_COST_TYPE_LEN: usize = 256;

/// Maximum number of nodes; ids and CSR offsets are stored as `u32`
pub const MAX_NODES: usize = u32::MAX as usize;

/// Maximum number of edges in one layer
pub const MAX_EDGES: usize = u32::MAX as usize;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NonFiniteCoordinate { x: f64, y: f64, z: f64 },
    NonFiniteCost(f32),
    CostTypeTooLong { len: usize, max: usize },
    EmptyCostType,
    TooManyNodes { count: usize, max: usize },
    TooManyEdges { count: usize, max: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFiniteCoordinate { x, y, z } => {
                write!(f, "Coordinate is not finite: ({}, {}, {})", x, y, z)
            }
            Self::NonFiniteCost(cost) => write!(f, "Cost is not finite: {}", cost),
            Self::CostTypeTooLong { len, max } => {
                write!(f, "Cost type name too long: {} bytes (max {})", len, max)
            }
            Self::EmptyCostType => {
                write!(f, "Cost type name cannot be empty for an alternate cost")
            }
            Self::TooManyNodes { count, max } => {
                write!(f, "Too many nodes: {} (max {})", count, max)
            }
            Self::TooManyEdges { count, max } => {
                write!(f, "Too many edges: {} (max {})", count, max)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a 3D coordinate
pub fn validate_coordinate(x: f64, y: f64, z: f64) -> Result<(), ValidationError> {
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return Err(ValidationError::NonFiniteCoordinate { x, y, z });
    }
    Ok(())
}

/// Validate an edge cost
pub fn validate_cost(cost: f32) -> Result<(), ValidationError> {
    if !cost.is_finite() {
        return Err(ValidationError::NonFiniteCost(cost));
    }
    Ok(())
}

/// Validate the name of an alternate cost type
pub fn validate_cost_type(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::EmptyCostType);
    }
    if name.len() > MAX_COST_TYPE_LEN {
        return Err(ValidationError::CostTypeTooLong {
            len: name.len(),
            max: MAX_COST_TYPE_LEN,
        });
    }
    Ok(())
}

/// Validate that one more node still fits the id space
pub fn validate_node_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_NODES {
        return Err(ValidationError::TooManyNodes {
            count,
            max: MAX_NODES,
        });
    }
    Ok(())
}

/// Validate that a layer's edge count fits the offset type
pub fn validate_edge_count(count: usize) -> Result<(), ValidationError> {
    if count > MAX_EDGES {
        return Err(ValidationError::TooManyEdges {
            count,
            max: MAX_EDGES,
        });
    }
    Ok(())
}
