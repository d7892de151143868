use crate::math::Point3;
use crate::segment::SegmentRef;

use super::diagnostic::{Diagnostic, EdgeRef};
use super::edge::Edge;

/// Edges of one segment together with its single-segment defects.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Canonical edges in local edge-number order. Collapsed edges and edge
    /// loops are omitted.
    pub edges: Vec<Edge>,
    /// Local numbers of edges whose control points all coincide.
    pub collapsed: Vec<u8>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Extracts the canonical edges of `segment`.
///
/// A zero-length edge (all of its control points identical) is legal and
/// simply dropped, unless a neighbouring edge of the same segment is
/// zero-length as well. An edge whose endpoints coincide while its interior
/// control points do not is always reported.
#[must_use]
pub fn extract_edges(segment: &SegmentRef<'_>) -> Extraction {
    let layouts = segment.kind.edge_layouts();
    let mut out = Extraction::default();

    for (number, layout) in (0u8..).zip(layouts) {
        let points: Vec<Point3> = layout.iter().map(|&i| segment.point(i)).collect();
        let first = points[0];
        let last = points[points.len() - 1];
        if points.iter().all(|p| *p == first) {
            out.collapsed.push(number);
            continue;
        }
        let edge = Edge::canonical(
            segment.index,
            number,
            segment.kind,
            segment.color,
            segment.tag.cloned(),
            &points,
        );
        if first == last {
            out.diagnostics.push(Diagnostic::EdgeLoop {
                edge: EdgeRef::from(&edge),
            });
            continue;
        }
        out.edges.push(edge);
    }

    let count = layouts.len();
    for n in 0..count {
        let next = (n + 1) % count;
        let (Ok(a), Ok(b)) = (u8::try_from(n), u8::try_from(next)) else {
            continue;
        };
        if out.collapsed.contains(&a) && out.collapsed.contains(&b) {
            let (first, second) = if a < b { (a, b) } else { (b, a) };
            out.diagnostics.push(Diagnostic::AdjacentDegenerateEdges {
                segment: segment.index,
                first,
                second,
                tag: segment.tag.cloned(),
            });
        }
    }

    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::{SegmentKind, Tag};
    use crate::test_support::patch_coords;

    fn segment(kind: SegmentKind, coords: &[f64]) -> SegmentRef<'_> {
        SegmentRef {
            index: 5,
            kind,
            coords,
            color: None,
            tag: None,
        }
    }

    #[test]
    fn planar_triangle_has_three_edges() {
        let coords = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let ex = extract_edges(&segment(SegmentKind::PlanarTriangle, &coords));
        assert_eq!(ex.edges.len(), 3);
        assert!(ex.diagnostics.is_empty());
        let numbers: Vec<u8> = ex.edges.iter().map(|e| e.local_edge_number).collect();
        assert_eq!(numbers, vec![0, 1, 2]);
        assert!(ex.edges.iter().all(|e| e.owning_segment == 5 && !e.is_cubic()));
        // p2 -> p0 runs from (0,1,0) down to the origin
        assert!(ex.edges[2].reversed);
    }

    #[test]
    fn patch_has_four_cubic_edges() {
        let coords = patch_coords(0.0);
        let ex = extract_edges(&segment(SegmentKind::CubicPatch, &coords));
        assert_eq!(ex.edges.len(), 4);
        assert!(ex.edges.iter().all(Edge::is_cubic));
    }

    #[test]
    fn vertex_has_one_cubic_and_two_straight_edges() {
        let coords = [
            0.0, 0.0, 0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 0.0, 3.0, 0.0, 0.0, 1.5, 0.0, 2.0,
        ];
        let ex = extract_edges(&segment(SegmentKind::CubicVertex, &coords));
        let cubic: Vec<bool> = ex.edges.iter().map(Edge::is_cubic).collect();
        assert_eq!(cubic, vec![true, false, false]);
    }

    #[test]
    fn single_collapsed_edge_is_dropped() {
        // v = 1 row collapsed to one point: a triangle-shaped patch
        let mut coords = patch_coords(0.0);
        for i in 12..16 {
            coords[3 * i..3 * i + 3].copy_from_slice(&[1.5, 3.0, 0.0]);
        }
        let ex = extract_edges(&segment(SegmentKind::CubicPatch, &coords));
        assert_eq!(ex.collapsed, vec![2]);
        assert_eq!(ex.edges.len(), 3);
        assert!(ex.diagnostics.is_empty());
    }

    #[test]
    fn adjacent_collapsed_edges_are_reported() {
        let mut coords = patch_coords(0.0);
        for i in [3, 7, 11, 12, 13, 14, 15] {
            coords[3 * i..3 * i + 3].copy_from_slice(&[3.0, 3.0, 0.0]);
        }
        let tag = Tag::from("corner");
        let seg = SegmentRef {
            tag: Some(&tag),
            ..segment(SegmentKind::CubicPatch, &coords)
        };
        let ex = extract_edges(&seg);
        assert_eq!(ex.collapsed, vec![1, 2]);
        assert!(matches!(
            ex.diagnostics.as_slice(),
            [Diagnostic::AdjacentDegenerateEdges { segment: 5, first: 1, second: 2, tag: Some(_) }]
        ));
    }

    #[test]
    fn edge_loop_is_reported() {
        let mut coords = patch_coords(0.0);
        // bottom row starts and ends at the same point but bulges in between
        coords.copy_within(0..3, 9);
        let ex = extract_edges(&segment(SegmentKind::CubicPatch, &coords));
        assert!(ex
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::EdgeLoop { edge } if edge.edge == 0)));
        assert!(ex.edges.iter().all(|e| e.local_edge_number != 0));
    }
}
