use std::cmp::Ordering;

use crate::math::{cmp_points, elevate_line, Point3};
use crate::segment::{Color, SegmentKind, Tag};

/// One geometric edge of a segment, in canonical form.
///
/// Endpoints are ordered lexicographically so that the two segments sharing
/// an edge produce equal records regardless of the direction in which they
/// traverse it. `reversed` records whether the segment's own traversal runs
/// from `p_end` to `p_start`.
#[derive(Debug, Clone)]
pub struct Edge {
    /// Index of the segment this edge belongs to.
    pub owning_segment: usize,
    /// Local edge number within the owning segment.
    pub local_edge_number: u8,
    /// Kind of the owning segment.
    pub kind: SegmentKind,
    /// Color of the owning segment.
    pub color: Option<Color>,
    /// Tag of the owning segment.
    pub tag: Option<Tag>,
    /// Lexicographically smaller endpoint.
    pub p_start: Point3,
    /// Lexicographically larger (or equal) endpoint.
    pub p_end: Point3,
    /// Interior control points running from `p_start` to `p_end`, if the
    /// edge is cubic.
    pub controls: Option<[Point3; 2]>,
    /// Whether the segment traverses the edge from `p_end` to `p_start`.
    pub reversed: bool,
}

/// An edge walked in a particular direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Traversal {
    pub from: Point3,
    pub controls: Option<[Point3; 2]>,
    pub to: Point3,
}

impl Edge {
    /// Builds the canonical edge from the control points of a local edge,
    /// given in the segment's traversal order.
    ///
    /// `points` holds either two points (straight edge) or four (cubic).
    #[must_use]
    pub fn canonical(
        owning_segment: usize,
        local_edge_number: u8,
        kind: SegmentKind,
        color: Option<Color>,
        tag: Option<Tag>,
        points: &[Point3],
    ) -> Self {
        let first = points[0];
        let last = points[points.len() - 1];
        let controls = (points.len() == 4).then(|| [points[1], points[2]]);
        let reversed = cmp_points(&last, &first) == Ordering::Less;
        let (p_start, p_end, controls) = if reversed {
            (last, first, controls.map(|[a, b]| [b, a]))
        } else {
            (first, last, controls)
        };
        Self {
            owning_segment,
            local_edge_number,
            kind,
            color,
            tag,
            p_start,
            p_end,
            controls,
            reversed,
        }
    }

    /// Returns `true` if the edge carries interior control points.
    #[must_use]
    pub fn is_cubic(&self) -> bool {
        self.controls.is_some()
    }

    /// Control points used for comparison. A straight edge reports the two
    /// points of its degree elevation to a cubic.
    #[must_use]
    pub fn effective_controls(&self) -> [Point3; 2] {
        self.controls.unwrap_or_else(|| {
            let (c1, c2) = elevate_line(&self.p_start, &self.p_end);
            [c1, c2]
        })
    }

    /// Total order over edge geometry: start point, end point, then the
    /// effective interior control points.
    #[must_use]
    pub fn cmp_geometry(&self, other: &Self) -> Ordering {
        cmp_points(&self.p_start, &other.p_start)
            .then_with(|| cmp_points(&self.p_end, &other.p_end))
            .then_with(|| {
                if self.controls.is_none() && other.controls.is_none() {
                    return Ordering::Equal;
                }
                let a = self.effective_controls();
                let b = other.effective_controls();
                cmp_points(&a[0], &b[0]).then_with(|| cmp_points(&a[1], &b[1]))
            })
    }

    /// Returns `true` if both edges occupy the same geometric locus.
    #[must_use]
    pub fn same_geometry(&self, other: &Self) -> bool {
        self.cmp_geometry(other) == Ordering::Equal
    }

    /// Point at which the owning segment enters the edge.
    #[must_use]
    pub fn origin(&self) -> Point3 {
        if self.reversed {
            self.p_end
        } else {
            self.p_start
        }
    }

    /// Point at which the owning segment leaves the edge.
    #[must_use]
    pub fn destination(&self) -> Point3 {
        if self.reversed {
            self.p_start
        } else {
            self.p_end
        }
    }

    /// Walks the edge from `p_start` to `p_end` when `forward`, otherwise
    /// the other way round.
    #[must_use]
    pub fn traversal(&self, forward: bool) -> Traversal {
        if forward {
            Traversal {
                from: self.p_start,
                controls: self.controls,
                to: self.p_end,
            }
        } else {
            Traversal {
                from: self.p_end,
                controls: self.controls.map(|[a, b]| [b, a]),
                to: self.p_start,
            }
        }
    }

    /// Walks the edge in the owning segment's direction.
    #[must_use]
    pub fn directed(&self) -> Traversal {
        self.traversal(!self.reversed)
    }
}
