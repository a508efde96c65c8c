// src/error.rs

use thiserror::Error;

/// Errors surfaced by shape construction and the fallible setters.
///
/// All operations in this crate are synchronous local computations; there is
/// no retry or recovery logic anywhere, failures are returned immediately.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("a shape needs at least 3 distinct vertices, got {got}")]
    TooFewVertices { got: usize },

    #[error("invalid shape specification: {0}")]
    InvalidSpec(String),

    #[error("shape radius is zero; cannot rescale a degenerate shape")]
    DegenerateRadius,

    #[error("failed to parse shape specification text: {0}")]
    SpecParse(#[from] serde_json::Error),
}
