//! Crate-wide error type
//!
//! Every failure in the core is a programmer or configuration error;
//! nothing here is transient or retryable.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `step` called on an environment that has not been reset, or whose
    /// episode has already terminated.
    #[error("environment requires resetting")]
    NeedsReset,

    /// Action index outside `[0, action_space)`.
    #[error("invalid action {action} for action space of size {size}")]
    InvalidAction { action: usize, size: usize },

    /// The ball center left the open unit square. Indicates a
    /// collision-resolution bug or numerically degenerate course geometry.
    #[error("ball out of bounds at ({x}, {y}) with velocity ({xdot}, {ydot})")]
    OutOfBounds { x: f64, y: f64, xdot: f64, ydot: f64 },

    /// Polygons need at least three vertices.
    #[error("polygon has {0} vertices, need at least 3")]
    TooFewVertices(usize),

    /// A zero-length edge has no defined direction.
    #[error("degenerate edge: coincident vertices at ({x}, {y})")]
    DegenerateEdge { x: f64, y: f64 },

    /// A configuration value outside its documented range.
    #[error("invalid configuration: {0}")]
    InvalidParameter(String),

    #[error("failed to read course file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse course file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize replay buffer: {0}")]
    Json(#[from] serde_json::Error),
}
