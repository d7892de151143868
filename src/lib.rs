//! Topology analysis for piecewise surfaces built from planar triangles,
//! cubic Bezier triangles, cubic Bezier vertices and bicubic Bezier patches.
//!
//! A [`Surface`] stores segments in insertion order. Topology queries
//! (well-formedness, boundary curves, connected components) are computed
//! lazily and cached until the next mutation.

pub mod error;
pub mod iter;
pub mod math;
pub mod operations;
pub mod segment;
pub mod surface;
pub mod topology;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Result, SurfaceError};
pub use iter::{SegmentCursor, SurfaceCursor, SurfaceSource};
pub use segment::{Color, SegmentKind, SegmentRef, Tag};
pub use surface::{ComponentView, Surface, SurfaceOptions};
pub use topology::{BoundaryPath, Component, Diagnostic, PathCommand};
