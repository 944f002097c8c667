//! Error types for the simulation core

use thiserror::Error;

/// Errors raised by the road graph, geometry and coordinator
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// Malformed graph data or a joint index outside the graph
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// `end` cannot be reached from `start` following lane directions
    #[error("No path from joint {start} to joint {end}")]
    PathNotFound { start: usize, end: usize },

    /// Attempted to take the direction of a zero-length vector
    #[error("Cannot normalize a zero-length vector")]
    DegenerateVector,
}

/// Result type for simulation operations
pub type SimResult<T> = std::result::Result<T, SimError>;
