//! De Casteljau subdivision for the cubic Bezier primitives.
//!
//! Every split happens at parameter one half and is evaluated with
//! `0.5 * a + 0.5 * b`, which is symmetric in its arguments. A curve split
//! from either end therefore produces bit-identical halves, so two segments
//! sharing an edge still agree after both have been subdivided.

use super::{elevate_line, Point3};

/// Symmetric midpoint of two points.
#[must_use]
pub fn midpoint(a: &Point3, b: &Point3) -> Point3 {
    Point3::new(
        0.5 * a.x + 0.5 * b.x,
        0.5 * a.y + 0.5 * b.y,
        0.5 * a.z + 0.5 * b.z,
    )
}

/// Splits a cubic Bezier curve at `t = 1/2`.
#[must_use]
pub fn split_cubic(c: &[Point3; 4]) -> ([Point3; 4], [Point3; 4]) {
    let m01 = midpoint(&c[0], &c[1]);
    let m12 = midpoint(&c[1], &c[2]);
    let m23 = midpoint(&c[2], &c[3]);
    let m012 = midpoint(&m01, &m12);
    let m123 = midpoint(&m12, &m23);
    let mid = midpoint(&m012, &m123);
    ([c[0], m01, m012, mid], [mid, m123, m23, c[3]])
}

/// Midpoint of a straight edge, computed on its degree-elevated cubic.
///
/// This matches the midpoint of a cubic edge whose interior control points
/// were produced by [`elevate_line`].
#[must_use]
pub fn line_midpoint(a: &Point3, b: &Point3) -> Point3 {
    let (c1, c2) = elevate_line(a, b);
    split_cubic(&[*a, c1, c2, *b]).0[3]
}

// --- Bicubic patches (control point P_ij at index i + 4j) ---

fn patch_row(patch: &[Point3; 16], j: usize) -> [Point3; 4] {
    [patch[4 * j], patch[4 * j + 1], patch[4 * j + 2], patch[4 * j + 3]]
}

fn patch_column(patch: &[Point3; 16], i: usize) -> [Point3; 4] {
    [patch[i], patch[i + 4], patch[i + 8], patch[i + 12]]
}

/// Splits a patch at `u = 1/2`, returning the low-u and high-u halves.
#[must_use]
pub fn split_patch_u(patch: &[Point3; 16]) -> ([Point3; 16], [Point3; 16]) {
    let mut low = [Point3::origin(); 16];
    let mut high = [Point3::origin(); 16];
    for j in 0..4 {
        let (l, h) = split_cubic(&patch_row(patch, j));
        low[4 * j..4 * j + 4].copy_from_slice(&l);
        high[4 * j..4 * j + 4].copy_from_slice(&h);
    }
    (low, high)
}

/// Splits a patch at `v = 1/2`, returning the low-v and high-v halves.
#[must_use]
pub fn split_patch_v(patch: &[Point3; 16]) -> ([Point3; 16], [Point3; 16]) {
    let mut low = [Point3::origin(); 16];
    let mut high = [Point3::origin(); 16];
    for i in 0..4 {
        let (l, h) = split_cubic(&patch_column(patch, i));
        for j in 0..4 {
            low[i + 4 * j] = l[j];
            high[i + 4 * j] = h[j];
        }
    }
    (low, high)
}

/// Quarters a patch into the sub-patches covering
/// `[0,½]×[0,½]`, `[½,1]×[0,½]`, `[0,½]×[½,1]` and `[½,1]×[½,1]`.
#[must_use]
pub fn quarter_patch(patch: &[Point3; 16]) -> [[Point3; 16]; 4] {
    let (low_u, high_u) = split_patch_u(patch);
    let (ll, lh) = split_patch_v(&low_u);
    let (hl, hh) = split_patch_v(&high_u);
    [ll, hl, lh, hh]
}

// --- Cubic vertices (curve c0..c3 plus apex) ---

/// Converts a cubic vertex into the equivalent bicubic patch.
///
/// The `v = 0` row is the curve, the `v = 1` row is collapsed onto the apex
/// and each column is the straight line from a curve control point to the
/// apex.
#[must_use]
pub fn vertex_to_patch(curve: &[Point3; 4], apex: &Point3) -> [Point3; 16] {
    let mut patch = [*apex; 16];
    for i in 0..4 {
        let (c1, c2) = elevate_line(&curve[i], apex);
        patch[i] = curve[i];
        patch[i + 4] = c1;
        patch[i + 8] = c2;
    }
    patch
}

/// Pieces produced by quartering a cubic vertex.
#[derive(Debug, Clone)]
pub struct VertexQuarters {
    /// The two patches covering the half nearest the curve.
    pub patches: [[Point3; 16]; 2],
    /// The two vertices covering the half nearest the apex, as `(curve, apex)`.
    pub vertices: [([Point3; 4], Point3); 2],
}

/// Quarters a cubic vertex into two patches and two smaller vertices.
#[must_use]
pub fn quarter_vertex(curve: &[Point3; 4], apex: &Point3) -> VertexQuarters {
    let patch = vertex_to_patch(curve, apex);
    let (bottom, _) = split_patch_v(&patch);
    let (left, right) = split_patch_u(&bottom);
    let mid_curve = patch_row(&bottom, 3);
    let (mid_left, mid_right) = split_cubic(&mid_curve);
    VertexQuarters {
        patches: [left, right],
        vertices: [(mid_left, *apex), (mid_right, *apex)],
    }
}

// --- Cubic triangles (P_ijk, weight u^i v^j w^k, k = 3 - i - j) ---

/// Storage index of `P_ijk` in a cubic triangle's control-point array.
#[must_use]
pub const fn triangle_index(i: usize, j: usize) -> usize {
    4 * i - i * i.saturating_sub(1) / 2 + j
}

/// The barycentric coordinate held at zero along a triangle edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleEdge {
    /// The `u = 0` edge, between the `v` and `w` corners.
    U0,
    /// The `v = 0` edge, between the `u` and `w` corners.
    V0,
    /// The `w = 0` edge, between the `u` and `v` corners.
    W0,
}

type Levels = [[[Point3; 4]; 4]; 4];

/// Runs the de Casteljau algorithm at the midpoint of `edge`, returning
/// every intermediate level as `levels[r][i][j]` with `k = 3 - r - i - j`.
fn triangle_levels(cp: &[Point3; 10], edge: TriangleEdge) -> Levels {
    let mut levels: Levels = [[[Point3::origin(); 4]; 4]; 4];
    for i in 0..=3 {
        for j in 0..=(3 - i) {
            levels[0][i][j] = cp[triangle_index(i, j)];
        }
    }
    for r in 0..3 {
        let n = 2 - r;
        for i in 0..=n {
            for j in 0..=(n - i) {
                let a = levels[r][i + 1][j];
                let b = levels[r][i][j + 1];
                let c = levels[r][i][j];
                levels[r + 1][i][j] = match edge {
                    TriangleEdge::W0 => midpoint(&a, &b),
                    TriangleEdge::V0 => midpoint(&a, &c),
                    TriangleEdge::U0 => midpoint(&b, &c),
                };
            }
        }
    }
    levels
}

/// Corner of a cubic triangle, named by the barycentric coordinate that is
/// one there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Corner {
    U,
    V,
    W,
}

/// Builds the sub-triangle obtained by moving `corner` to the split point.
fn replace_corner(levels: &Levels, corner: Corner) -> [Point3; 10] {
    let mut out = [Point3::origin(); 10];
    for i in 0..=3 {
        for j in 0..=(3 - i) {
            let k = 3 - i - j;
            out[triangle_index(i, j)] = match corner {
                Corner::U => levels[i][0][j],
                Corner::V => levels[j][i][0],
                Corner::W => levels[k][i][j],
            };
        }
    }
    out
}

/// Splits a cubic triangle at the midpoint of one edge.
///
/// Both halves keep the orientation of the original triangle. The first
/// half keeps the corner that comes first in `u, v, w` order.
#[must_use]
pub fn bisect_triangle(cp: &[Point3; 10], edge: TriangleEdge) -> ([Point3; 10], [Point3; 10]) {
    let levels = triangle_levels(cp, edge);
    match edge {
        // Keeps U, replaces V | keeps V, replaces U.
        TriangleEdge::W0 => (
            replace_corner(&levels, Corner::V),
            replace_corner(&levels, Corner::U),
        ),
        TriangleEdge::V0 => (
            replace_corner(&levels, Corner::W),
            replace_corner(&levels, Corner::U),
        ),
        TriangleEdge::U0 => (
            replace_corner(&levels, Corner::W),
            replace_corner(&levels, Corner::V),
        ),
    }
}

/// Quarters a cubic triangle so that each of its three edges is split
/// exactly once at its midpoint.
#[must_use]
pub fn quarter_triangle(cp: &[Point3; 10]) -> [[Point3; 10]; 4] {
    // The u-corner half still owns the whole v = 0 edge, the v-corner half
    // the whole u = 0 edge.
    let (u_half, v_half) = bisect_triangle(cp, TriangleEdge::W0);
    let (a, b) = bisect_triangle(&u_half, TriangleEdge::V0);
    let (c, d) = bisect_triangle(&v_half, TriangleEdge::U0);
    [a, b, c, d]
}

/// Quarters a planar triangle at its (degree-elevated) edge midpoints.
#[must_use]
pub fn quarter_planar(p: &[Point3; 3]) -> [[Point3; 3]; 4] {
    let m01 = line_midpoint(&p[0], &p[1]);
    let m12 = line_midpoint(&p[1], &p[2]);
    let m20 = line_midpoint(&p[2], &p[0]);
    [
        [p[0], m01, m20],
        [m01, p[1], m12],
        [m20, m12, p[2]],
        [m01, m12, m20],
    ]
}
