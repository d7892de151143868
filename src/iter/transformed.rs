use crate::error::Result;
use crate::math::{Point3, Transform3};
use crate::segment::{Color, SegmentKind, Tag};

use super::SurfaceCursor;

/// A cursor that maps every control point of an inner cursor through a
/// transform. The underlying surface is left untouched.
#[derive(Debug, Clone)]
pub struct TransformCursor<C, T> {
    inner: C,
    transform: T,
}

impl<C: SurfaceCursor, T: Transform3> TransformCursor<C, T> {
    /// Wraps `inner`.
    pub fn new(inner: C, transform: T) -> Self {
        Self { inner, transform }
    }

    /// Returns the wrapped cursor.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: SurfaceCursor, T: Transform3> SurfaceCursor for TransformCursor<C, T> {
    fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    fn advance(&mut self) {
        self.inner.advance();
    }

    fn current_segment(&self, coords: &mut [f64]) -> Result<SegmentKind> {
        let kind = self.inner.current_segment(coords)?;
        for chunk in coords[..kind.coord_count()].chunks_exact_mut(3) {
            let q = self
                .transform
                .apply(&Point3::new(chunk[0], chunk[1], chunk[2]));
            chunk.copy_from_slice(&[q.x, q.y, q.z]);
        }
        Ok(kind)
    }

    fn current_color(&self) -> Option<Color> {
        self.inner.current_color()
    }

    fn current_tag(&self) -> Option<Tag> {
        self.inner.current_tag()
    }
}
