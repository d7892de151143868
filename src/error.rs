use thiserror::Error;

use crate::segment::SegmentKind;

/// Top-level error type for the surface topology engine.
///
/// Only caller contract violations are reported through this type.
/// Malformed geometry is an expected input and is reported through
/// [`crate::topology::Diagnostic`] records instead.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to segment storage and iteration.
#[derive(Debug, Error)]
pub enum SegmentError {
    #[error("segment index {index} is out of range (surface has {len} segments)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{kind:?} requires {expected} coordinates, got {actual}")]
    ControlPointCount {
        kind: SegmentKind,
        expected: usize,
        actual: usize,
    },

    #[error("coordinate {index} is not finite")]
    NonFiniteCoordinate { index: usize },

    #[error("coordinate {index} is out of range for single precision storage")]
    CoordinateOutOfRange { index: usize },

    #[error("coordinate buffer holds {actual} values, {needed} required")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("cursor is exhausted")]
    CursorExhausted,
}

/// Errors related to topology queries.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("surface is not well formed")]
    NotWellFormed,

    #[error("component index {index} is out of range ({count} components)")]
    ComponentOutOfRange { index: usize, count: usize },
}

/// Errors related to surface operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`SurfaceError`].
pub type Result<T> = std::result::Result<T, SurfaceError>;
