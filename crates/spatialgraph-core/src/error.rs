//! Error types for Spatialgraph Core

use crate::limits::ValidationError;
use crate::node::NodeId;
use thiserror::Error;

/// Result type alias using Spatialgraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Spatialgraph error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Graph must be compressed before {operation}")]
    NotCompressed { operation: &'static str },

    #[error("Graph is already compressed, cannot {operation}")]
    AlreadyCompressed { operation: &'static str },

    #[error("Edge {parent} -> {child} does not exist in the structural layer (cost type '{cost_type}')")]
    OutOfRange {
        cost_type: String,
        parent: NodeId,
        child: NodeId,
    },

    #[error("No such cost type: '{0}'")]
    NoSuchCostType(String),

    #[error("Internal defect: {0}")]
    InternalDefect(String),
}

impl Error {
    /// Build an `InternalDefect`, logging it at error level.
    ///
    /// Reaching this is always a bug in the engine, never a usage error.
    pub fn internal(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("internal defect: {}", message);
        Self::InternalDefect(message)
    }

    /// Status code reported to a marshaling layer for this error.
    ///
    /// `InvalidArgument` reports `OutOfRange`, and `AlreadyCompressed` reports `NotCompressed`.
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidArgument(_) | Self::OutOfRange { .. } => Status::OutOfRange,
            Self::NotCompressed { .. } | Self::AlreadyCompressed { .. } => Status::NotCompressed,
            Self::NoSuchCostType(_) => Status::NoCost,
            Self::InternalDefect(_) => Status::GenericError,
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Closed set of status codes for handle-based callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Ok = 1,
    NotCompressed = 2,
    OutOfRange = 3,
    NoCost = 4,
    GenericError = 0,
}

impl Status {
    /// Status of an operation's outcome
    pub fn of<T>(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Self::Ok,
            Err(err) => err.status(),
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::NotCompressed => "NOT_COMPRESSED",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::NoCost => "NO_COST",
            Self::GenericError => "GENERIC_ERROR",
        };
        f.write_str(name)
    }
}
