mod boundary;
mod bounding_box;

pub use boundary::{BoundaryReport, ComputeBoundary};
pub use bounding_box::BoundingBox;
