mod store;
mod tag;

pub use store::SegmentStore;
pub use tag::{Tag, TagValue};

use crate::math::Point3;

/// The primitive kind of a surface segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    /// A flat triangle given by its three corners.
    PlanarTriangle,
    /// A cubic Bezier triangle in barycentric form (10 control points).
    CubicTriangle,
    /// A cubic Bezier curve joined to an apex by straight lines (5 control points).
    CubicVertex,
    /// A bicubic Bezier patch (16 control points).
    CubicPatch,
}

/// Point indices of one local edge, in traversal order.
///
/// Two entries describe a straight edge, four a cubic edge.
pub(crate) type EdgeLayout = &'static [usize];

const PLANAR_EDGES: [EdgeLayout; 3] = [&[0, 1], &[1, 2], &[2, 0]];

// P003 P102 P201 P300 | P300 P210 P120 P030 | P030 P021 P012 P003
const TRIANGLE_EDGES: [EdgeLayout; 3] = [&[0, 4, 7, 9], &[9, 8, 6, 3], &[3, 2, 1, 0]];

const VERTEX_EDGES: [EdgeLayout; 3] = [&[0, 1, 2, 3], &[3, 4], &[4, 0]];

const PATCH_EDGES: [EdgeLayout; 4] = [
    &[0, 1, 2, 3],
    &[3, 7, 11, 15],
    &[15, 14, 13, 12],
    &[12, 8, 4, 0],
];

const PLANAR_FLIP: [usize; 3] = [0, 2, 1];

// P_ijk -> P_jik
const TRIANGLE_FLIP: [usize; 10] = [0, 4, 7, 9, 1, 5, 8, 2, 6, 3];

const VERTEX_FLIP: [usize; 5] = [3, 2, 1, 0, 4];

// P_ij -> P_ji
const PATCH_FLIP: [usize; 16] = [0, 4, 8, 12, 1, 5, 9, 13, 2, 6, 10, 14, 3, 7, 11, 15];

impl SegmentKind {
    /// Number of control points.
    #[must_use]
    pub const fn point_count(self) -> usize {
        match self {
            Self::PlanarTriangle => 3,
            Self::CubicTriangle => 10,
            Self::CubicVertex => 5,
            Self::CubicPatch => 16,
        }
    }

    /// Number of coordinates (three per control point).
    #[must_use]
    pub const fn coord_count(self) -> usize {
        self.point_count() * 3
    }

    /// Number of local edges.
    #[must_use]
    pub const fn edge_count(self) -> usize {
        match self {
            Self::CubicPatch => 4,
            _ => 3,
        }
    }

    /// Control-point indices of each local edge, in edge-number order.
    pub(crate) fn edge_layouts(self) -> &'static [EdgeLayout] {
        match self {
            Self::PlanarTriangle => &PLANAR_EDGES,
            Self::CubicTriangle => &TRIANGLE_EDGES,
            Self::CubicVertex => &VERTEX_EDGES,
            Self::CubicPatch => &PATCH_EDGES,
        }
    }

    /// Control-point permutation that reverses the segment's orientation.
    ///
    /// Entry `n` names the source point stored at position `n`. Every
    /// permutation is an involution.
    pub(crate) fn flip_permutation(self) -> &'static [usize] {
        match self {
            Self::PlanarTriangle => &PLANAR_FLIP,
            Self::CubicTriangle => &TRIANGLE_FLIP,
            Self::CubicVertex => &VERTEX_FLIP,
            Self::CubicPatch => &PATCH_FLIP,
        }
    }
}

/// An RGBA color attached to a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Creates an opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha channel.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// A borrowed view of one stored segment.
#[derive(Debug, Clone, Copy)]
pub struct SegmentRef<'a> {
    /// Index of the segment within the source it was read from.
    pub index: usize,
    /// The primitive kind.
    pub kind: SegmentKind,
    /// Packed `x, y, z` control-point coordinates.
    pub coords: &'a [f64],
    /// Optional color.
    pub color: Option<Color>,
    /// Optional creation tag.
    pub tag: Option<&'a Tag>,
}

impl SegmentRef<'_> {
    /// Returns control point `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n` is not below the kind's point count.
    #[must_use]
    pub fn point(&self, n: usize) -> Point3 {
        Point3::new(self.coords[3 * n], self.coords[3 * n + 1], self.coords[3 * n + 2])
    }

    /// Returns all control points.
    #[must_use]
    pub fn points(&self) -> Vec<Point3> {
        (0..self.kind.point_count()).map(|n| self.point(n)).collect()
    }
}

/// Applies `kind`'s flip permutation to packed coordinates.
pub(crate) fn flip_coords(kind: SegmentKind, coords: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(coords.len());
    for &src in kind.flip_permutation() {
        out.extend_from_slice(&coords[3 * src..3 * src + 3]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::bezier::triangle_index;

    const KINDS: [SegmentKind; 4] = [
        SegmentKind::PlanarTriangle,
        SegmentKind::CubicTriangle,
        SegmentKind::CubicVertex,
        SegmentKind::CubicPatch,
    ];

    #[test]
    fn counts_match_kinds() {
        let coords: Vec<usize> = KINDS.iter().map(|k| k.coord_count()).collect();
        assert_eq!(coords, vec![9, 30, 15, 48]);
        for kind in KINDS {
            assert_eq!(kind.edge_layouts().len(), kind.edge_count());
        }
    }

    #[test]
    fn edges_chain_end_to_start() {
        for kind in KINDS {
            let layouts = kind.edge_layouts();
            for (n, layout) in layouts.iter().enumerate() {
                let next = layouts[(n + 1) % layouts.len()];
                assert_eq!(layout[layout.len() - 1], next[0], "{kind:?} edge {n}");
            }
        }
    }

    #[test]
    fn flips_are_involutions() {
        for kind in KINDS {
            let perm = kind.flip_permutation();
            assert_eq!(perm.len(), kind.point_count());
            for (n, &src) in perm.iter().enumerate() {
                assert_eq!(perm[src], n, "{kind:?}");
            }
        }
    }

    #[test]
    fn triangle_flip_swaps_u_and_v() {
        let perm = SegmentKind::CubicTriangle.flip_permutation();
        for i in 0..=3 {
            for j in 0..=(3 - i) {
                assert_eq!(perm[triangle_index(i, j)], triangle_index(j, i));
            }
        }
    }

    #[test]
    fn flip_coords_reorders_points() {
        let coords: Vec<f64> = (0..9).map(f64::from).collect();
        let flipped = flip_coords(SegmentKind::PlanarTriangle, &coords);
        assert_eq!(flipped, vec![0.0, 1.0, 2.0, 6.0, 7.0, 8.0, 3.0, 4.0, 5.0]);
    }
}
