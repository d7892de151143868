use crate::error::Result;
use crate::iter::SurfaceSource;
use crate::math::Aabb;

/// Computes the axis-aligned bounding box of every control point of a
/// segment source.
///
/// Bezier segments lie inside the convex hull of their control points, so
/// the box also bounds the surface itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundingBox;

impl BoundingBox {
    /// Creates a new `BoundingBox` query.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Executes the query. Returns `None` for an empty source.
    ///
    /// # Errors
    ///
    /// Returns an error if a segment of `source` cannot be read.
    pub fn execute(&self, source: &impl SurfaceSource) -> Result<Option<Aabb>> {
        let mut aabb: Option<Aabb> = None;
        for index in 0..source.segment_count() {
            let segment = source.segment(index)?;
            for point in segment.points() {
                match aabb.as_mut() {
                    Some(b) => b.include(&point),
                    None => aabb = Some(Aabb::from_point(point)),
                }
            }
        }
        Ok(aabb)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::{Point3, Vector3};
    use crate::test_support::{two_cubes, unit_cube};
    use crate::Surface;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn unit_cube_box() {
        let aabb = BoundingBox::new().execute(&unit_cube()).unwrap().unwrap();
        assert_eq!(aabb.min, p(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, p(1.0, 1.0, 1.0));
        assert_eq!(aabb.size(), Vector3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn empty_surface_has_no_box() {
        assert!(BoundingBox::new().execute(&Surface::new()).unwrap().is_none());
    }

    #[test]
    fn component_box() {
        let surface = two_cubes();
        let view = surface.component_view(1).unwrap();
        let aabb = BoundingBox::new().execute(&view).unwrap().unwrap();
        assert_eq!(aabb.min, p(3.0, 0.0, 0.0));
        assert_eq!(aabb.max, p(4.0, 1.0, 1.0));
    }
}
