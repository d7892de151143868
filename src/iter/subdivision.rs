use crate::error::{OperationError, Result, SegmentError};
use crate::math::bezier::{quarter_patch, quarter_planar, quarter_triangle, quarter_vertex};
use crate::math::Point3;
use crate::segment::{Color, SegmentKind, Tag};

use super::cursor::fill_buffer;
use super::SurfaceCursor;

/// Deepest subdivision accepted; each level multiplies the output by four.
pub const MAX_SUBDIVISION_DEPTH: usize = 8;

/// One piece of a subdivided segment.
#[derive(Debug, Clone)]
enum Piece {
    Planar([Point3; 3]),
    Triangle([Point3; 10]),
    Vertex([Point3; 4], Point3),
    Patch([Point3; 16]),
}

fn points<const N: usize>(coords: &[f64]) -> [Point3; N] {
    std::array::from_fn(|n| Point3::new(coords[3 * n], coords[3 * n + 1], coords[3 * n + 2]))
}

impl Piece {
    fn from_coords(kind: SegmentKind, coords: &[f64]) -> Self {
        match kind {
            SegmentKind::PlanarTriangle => Self::Planar(points(coords)),
            SegmentKind::CubicTriangle => Self::Triangle(points(coords)),
            SegmentKind::CubicVertex => {
                let p: [Point3; 5] = points(coords);
                Self::Vertex([p[0], p[1], p[2], p[3]], p[4])
            }
            SegmentKind::CubicPatch => Self::Patch(points(coords)),
        }
    }

    fn kind(&self) -> SegmentKind {
        match self {
            Self::Planar(_) => SegmentKind::PlanarTriangle,
            Self::Triangle(_) => SegmentKind::CubicTriangle,
            Self::Vertex(..) => SegmentKind::CubicVertex,
            Self::Patch(_) => SegmentKind::CubicPatch,
        }
    }

    fn coords(&self) -> Vec<f64> {
        let pts: Vec<Point3> = match self {
            Self::Planar(p) => p.to_vec(),
            Self::Triangle(p) => p.to_vec(),
            Self::Vertex(curve, apex) => curve.iter().chain(std::iter::once(apex)).copied().collect(),
            Self::Patch(p) => p.to_vec(),
        };
        pts.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    fn quarter(&self) -> Vec<Self> {
        match self {
            Self::Planar(p) => quarter_planar(p).into_iter().map(Self::Planar).collect(),
            Self::Triangle(p) => quarter_triangle(p).into_iter().map(Self::Triangle).collect(),
            Self::Patch(p) => quarter_patch(p).into_iter().map(Self::Patch).collect(),
            Self::Vertex(curve, apex) => {
                let q = quarter_vertex(curve, apex);
                let mut out: Vec<Self> = q.patches.into_iter().map(Self::Patch).collect();
                out.extend(q.vertices.into_iter().map(|(c, a)| Self::Vertex(c, a)));
                out
            }
        }
    }
}

/// A cursor that replaces every segment of an inner cursor by its
/// recursive quartering, `depth` levels deep.
///
/// Cubic vertices split into two patches and two smaller vertices, every
/// other kind into four pieces of its own kind. Pieces inherit the color
/// and tag of the segment they came from.
#[derive(Debug, Clone)]
pub struct SubdivisionCursor<C> {
    inner: C,
    depth: usize,
    pieces: Vec<(SegmentKind, Vec<f64>)>,
    piece: usize,
}

impl<C: SurfaceCursor> SubdivisionCursor<C> {
    /// Wraps `inner`.
    ///
    /// # Errors
    ///
    /// Returns an error if `depth` exceeds [`MAX_SUBDIVISION_DEPTH`].
    pub fn new(inner: C, depth: usize) -> Result<Self> {
        if depth > MAX_SUBDIVISION_DEPTH {
            return Err(OperationError::InvalidInput(format!(
                "subdivision depth {depth} exceeds {MAX_SUBDIVISION_DEPTH}"
            ))
            .into());
        }
        let mut cursor = Self {
            inner,
            depth,
            pieces: Vec::new(),
            piece: 0,
        };
        cursor.load();
        Ok(cursor)
    }

    fn load(&mut self) {
        self.pieces.clear();
        self.piece = 0;
        if self.inner.is_done() {
            return;
        }
        let mut buf = [0.0; 48];
        let Ok(kind) = self.inner.current_segment(&mut buf) else {
            return;
        };
        let mut pieces = vec![Piece::from_coords(kind, &buf)];
        for _ in 0..self.depth {
            pieces = pieces.iter().flat_map(Piece::quarter).collect();
        }
        self.pieces = pieces.iter().map(|p| (p.kind(), p.coords())).collect();
    }
}

impl<C: SurfaceCursor> SurfaceCursor for SubdivisionCursor<C> {
    fn is_done(&self) -> bool {
        self.inner.is_done()
    }

    fn advance(&mut self) {
        if self.inner.is_done() {
            return;
        }
        self.piece += 1;
        if self.piece >= self.pieces.len() {
            self.inner.advance();
            self.load();
        }
    }

    fn current_segment(&self, coords: &mut [f64]) -> Result<SegmentKind> {
        let (kind, src) = self
            .pieces
            .get(self.piece)
            .ok_or(SegmentError::CursorExhausted)?;
        fill_buffer(coords, src)?;
        Ok(*kind)
    }

    fn current_color(&self) -> Option<Color> {
        self.inner.current_color()
    }

    fn current_tag(&self) -> Option<Tag> {
        self.inner.current_tag()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::iter::SurfaceSource;
    use crate::test_support::{patch_coords, unit_cube};
    use crate::Surface;

    fn count(mut cursor: impl SurfaceCursor) -> usize {
        let mut n = 0;
        while !cursor.is_done() {
            n += 1;
            cursor.advance();
        }
        n
    }

    #[test]
    fn depth_zero_is_identity() {
        let surface = unit_cube();
        let cursor = SubdivisionCursor::new(surface.cursor(), 0).unwrap();
        assert_eq!(count(cursor), 12);
    }

    #[test]
    fn each_level_quarters() {
        let surface = unit_cube();
        assert_eq!(count(SubdivisionCursor::new(surface.cursor(), 1).unwrap()), 48);
        assert_eq!(count(SubdivisionCursor::new(surface.cursor(), 2).unwrap()), 192);
    }

    #[test]
    fn rejects_excessive_depth() {
        let surface = unit_cube();
        assert!(SubdivisionCursor::new(surface.cursor(), MAX_SUBDIVISION_DEPTH + 1).is_err());
    }

    #[test]
    fn vertex_splits_into_patches_and_vertices() {
        let mut surface = Surface::new();
        let coords = [
            0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 0.0, 3.0, 0.0, 0.0, 1.5, 0.0, 2.0,
        ];
        surface
            .add_cubic_vertex(&coords, None, Some("wedge".into()))
            .unwrap();
        let mut cursor = SubdivisionCursor::new(surface.cursor(), 1).unwrap();
        let mut kinds = Vec::new();
        let mut buf = [0.0; 48];
        while !cursor.is_done() {
            kinds.push(cursor.current_segment(&mut buf).unwrap());
            assert_eq!(cursor.current_tag().unwrap().to_string(), "wedge");
            cursor.advance();
        }
        assert_eq!(
            kinds,
            vec![
                SegmentKind::CubicPatch,
                SegmentKind::CubicPatch,
                SegmentKind::CubicVertex,
                SegmentKind::CubicVertex
            ]
        );
    }

    #[test]
    fn subdivided_closed_cube_stays_closed() {
        let surface = unit_cube();
        let cursor = SubdivisionCursor::new(surface.cursor(), 2).unwrap();
        let mut refined = Surface::new();
        refined.append_cursor(cursor).unwrap();
        assert_eq!(refined.segment_count(), 192);
        assert!(refined.is_well_formed());
        assert!(refined.is_closed_manifold());
    }

    #[test]
    fn subdivided_patch_keeps_single_boundary_loop() {
        let mut surface = Surface::new();
        surface.add_cubic_patch(&patch_coords(0.0), None, None).unwrap();
        let mut refined = Surface::new();
        refined
            .append_cursor(SubdivisionCursor::new(surface.cursor(), 1).unwrap())
            .unwrap();
        assert!(refined.is_well_formed());
        let boundary = refined.boundary().unwrap();
        assert_eq!(boundary.loop_count(), 1);
        assert_eq!(boundary.edge_count(), 8);
    }
}
