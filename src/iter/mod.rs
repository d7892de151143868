//! Sequential access to a surface's segments.
//!
//! Cursors borrow their source immutably, so any number of them may walk
//! the same snapshot at once. None of them reads or writes the topology
//! cache of a [`crate::Surface`].

mod cursor;
mod subdivision;
mod transformed;

pub use cursor::{SegmentCursor, SurfaceCursor, SurfaceSource};
pub use subdivision::SubdivisionCursor;
pub use transformed::TransformCursor;
