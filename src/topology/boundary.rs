use tracing::trace;

use crate::math::{Point3, PointKey};
use crate::segment::{Color, Tag};

use super::diagnostic::{Diagnostic, EdgeRef};
use super::edge::{Edge, Traversal};
use super::validate::Validation;

/// One drawing command of a boundary path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Starts a new curve at the given point.
    MoveTo(Point3),
    /// Straight edge to the given point.
    LineTo(Point3),
    /// Cubic edge with two interior control points and an end point.
    CubicTo(Point3, Point3, Point3),
    /// Closes the current curve back to its start point.
    Close,
}

impl PathCommand {
    /// End point of an edge-traversing command.
    #[must_use]
    pub fn end_point(&self) -> Option<Point3> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::CubicTo(_, _, p) => Some(p),
            Self::Close => None,
        }
    }
}

/// The boundary curves of a surface.
///
/// Each curve starts with a [`PathCommand::MoveTo`] and ends with a
/// [`PathCommand::Close`] unless it is open. The metadata lists hold one
/// entry per `LineTo`/`CubicTo`, in command order.
#[derive(Debug, Clone, Default)]
pub struct BoundaryPath {
    pub commands: Vec<PathCommand>,
    pub tags: Vec<Option<Tag>>,
    pub colors: Vec<Option<Color>>,
    pub segment_indices: Vec<usize>,
    pub edge_numbers: Vec<usize>,
}

impl BoundaryPath {
    /// Returns `true` if the surface has no boundary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of boundary edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.segment_indices.len()
    }

    /// Number of separate curves.
    #[must_use]
    pub fn loop_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// Number of curves that end with a close.
    #[must_use]
    pub fn closed_loop_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::Close))
            .count()
    }

    /// Commands of each curve, starting with its move.
    pub fn loops(&self) -> impl Iterator<Item = &[PathCommand]> {
        self.commands
            .chunk_by(|_, next| !matches!(next, PathCommand::MoveTo(_)))
    }

    fn move_to(&mut self, p: Point3) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn push_edge(&mut self, edge: &Edge, walk: &Traversal) {
        let command = match walk.controls {
            Some([c1, c2]) => PathCommand::CubicTo(c1, c2, walk.to),
            None => PathCommand::LineTo(walk.to),
        };
        self.commands.push(command);
        self.tags.push(edge.tag.clone());
        self.colors.push(edge.color);
        self.segment_indices.push(edge.owning_segment);
        self.edge_numbers.push(usize::from(edge.local_edge_number));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

/// Chains the unmatched edges of a validation into boundary curves.
///
/// Only meaningful for a well-formed validation. A curve that cannot be
/// continued is left open when multiple starts are allowed; otherwise it is
/// reported and the boundary must be treated as malformed.
#[must_use]
pub fn build_path(validation: &Validation) -> (BoundaryPath, Vec<Diagnostic>) {
    let mut builder = PathBuilder {
        validation,
        consumed: vec![false; validation.edges.len()],
        path: BoundaryPath::default(),
        diagnostics: Vec::new(),
    };
    for &start in &validation.boundary {
        if !builder.consumed[start] {
            builder.trace_loop(start);
        }
    }
    (builder.path, builder.diagnostics)
}

struct PathBuilder<'a> {
    validation: &'a Validation,
    consumed: Vec<bool>,
    path: BoundaryPath,
    diagnostics: Vec<Diagnostic>,
}

impl PathBuilder<'_> {
    fn trace_loop(&mut self, start: usize) {
        let validation = self.validation;
        let edges = &validation.edges;
        let mut current = start;
        let mut walk = edges[start].directed();
        let loop_start = walk.from;
        self.path.move_to(loop_start);
        let mut count = 0usize;

        loop {
            self.consumed[current] = true;
            self.path.push_edge(&edges[current], &walk);
            count += 1;

            if walk.to == loop_start {
                self.path.close();
                trace!(edges = count, "closed boundary loop");
                return;
            }
            let Some((next, next_walk)) = self.next_edge(current, walk.to) else {
                if validation.options.allow_multiple_starts {
                    trace!(edges = count, "open boundary curve");
                } else {
                    self.diagnostics.push(Diagnostic::BoundaryNotClosed {
                        edge: EdgeRef::from(&edges[current]),
                    });
                }
                return;
            };
            current = next;
            walk = next_walk;
        }
    }

    /// Finds the unconsumed boundary edge continuing from `at`.
    fn next_edge(&self, current: usize, at: Point3) -> Option<(usize, Traversal)> {
        let incidence = self.validation.endpoints.get(&PointKey::new(&at))?;
        let edges = &self.validation.edges;
        let next = incidence
            .iter()
            .find(|&n| n != current && !self.consumed[n])?;
        let edge = &edges[next];
        let walk = if self.validation.options.oriented {
            edge.directed()
        } else {
            edge.traversal(edge.p_start == at)
        };
        Some((next, walk))
    }
}
