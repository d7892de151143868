use std::collections::HashMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use tracing::warn;

use crate::math::{Point3, PointKey};

use super::diagnostic::{Diagnostic, EdgeRef};
use super::edge::Edge;

/// Parameters controlling which boundary configurations are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryOptions {
    /// Shared edges must be traversed in opposite directions.
    pub oriented: bool,
    /// Accept two boundary edges leaving the same point, and open boundary
    /// curves.
    pub allow_multiple_starts: bool,
}

impl Default for BoundaryOptions {
    fn default() -> Self {
        Self {
            oriented: true,
            allow_multiple_starts: false,
        }
    }
}

/// Up to two boundary edges registered at one point.
///
/// Values are indices into [`Validation::edges`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Incidence {
    pub primary: usize,
    pub secondary: Option<usize>,
}

impl Incidence {
    /// Iterates the registered edges, primary first.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        std::iter::once(self.primary).chain(self.secondary)
    }
}

/// Result of validating the edges of a surface.
#[derive(Debug, Clone)]
pub struct Validation {
    pub options: BoundaryOptions,
    pub well_formed: bool,
    /// All edges, sorted by geometry.
    pub edges: Vec<Edge>,
    /// Maximal runs of geometrically equal edges, as ranges into `edges`.
    pub runs: Vec<Range<usize>>,
    /// Indices of unmatched edges, in sorted order.
    pub boundary: Vec<usize>,
    /// Boundary edges by point. Oriented surfaces key each edge by the
    /// point it leaves from; unoriented surfaces register both endpoints.
    pub endpoints: HashMap<PointKey, Incidence>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    /// Range of edges geometrically equal to `edge`.
    #[must_use]
    pub fn equal_range(&self, edge: &Edge) -> Range<usize> {
        let start = self
            .edges
            .partition_point(|e| e.cmp_geometry(edge).is_lt());
        let len = self.edges[start..]
            .iter()
            .take_while(|e| e.same_geometry(edge))
            .count();
        start..start + len
    }

    /// Index of the edge matched with `self.edges[index]`, if any.
    ///
    /// On oriented surfaces the partner must traverse the edge in the
    /// opposite direction.
    #[must_use]
    pub fn partner(&self, index: usize) -> Option<usize> {
        let edge = &self.edges[index];
        self.equal_range(edge).find(|&j| {
            j != index && (!self.options.oriented || self.edges[j].reversed != edge.reversed)
        })
    }
}

/// Sorts edges, partitions them into runs of equal geometry and checks the
/// manifold rules.
///
/// Conflicts are accumulated as diagnostics and never abort validation.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    options: BoundaryOptions,
    counter: Option<Arc<AtomicUsize>>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new(options: BoundaryOptions) -> Self {
        Self {
            options,
            counter: None,
        }
    }

    /// Counts every validation run in `counter`.
    #[must_use]
    pub fn with_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Returns the options this validator applies.
    #[must_use]
    pub fn options(&self) -> BoundaryOptions {
        self.options
    }

    /// Validates `edges`. `diagnostics` carries defects already found while
    /// extracting them; any entry there makes the result malformed.
    #[must_use]
    pub fn validate(&self, mut edges: Vec<Edge>, diagnostics: Vec<Diagnostic>) -> Validation {
        if let Some(counter) = &self.counter {
            counter.fetch_add(1, AtomicOrdering::Relaxed);
        }
        for diagnostic in &diagnostics {
            warn!(%diagnostic, "malformed segment");
        }

        edges.sort_by(Edge::cmp_geometry);
        let runs = equal_runs(&edges);

        let mut validation = Validation {
            options: self.options,
            well_formed: true,
            edges,
            runs,
            boundary: Vec::new(),
            endpoints: HashMap::new(),
            diagnostics,
        };
        let mut conflicts = Vec::new();

        for run in &validation.runs {
            match run.len() {
                1 => validation.boundary.push(run.start),
                2 => {
                    let (a, b) = (&validation.edges[run.start], &validation.edges[run.start + 1]);
                    if self.options.oriented && a.reversed == b.reversed {
                        conflicts.push(Diagnostic::OrientationConflict {
                            first: a.into(),
                            second: b.into(),
                        });
                    }
                }
                _ => conflicts.push(Diagnostic::EdgeMultiplicity {
                    edges: validation.edges[run.clone()].iter().map(EdgeRef::from).collect(),
                }),
            }
        }

        for &index in &validation.boundary {
            let edge = &validation.edges[index];
            let points = if self.options.oriented {
                vec![edge.origin()]
            } else {
                vec![edge.p_start, edge.p_end]
            };
            for point in points {
                self.register(
                    &mut validation.endpoints,
                    &validation.edges,
                    point,
                    index,
                    &mut conflicts,
                );
            }
        }

        for diagnostic in &conflicts {
            warn!(%diagnostic, "surface conflict");
        }
        validation.diagnostics.extend(conflicts);
        validation.well_formed = validation.diagnostics.is_empty();
        validation
    }

    /// Records boundary edge `index` at `point`.
    fn register(
        &self,
        endpoints: &mut HashMap<PointKey, Incidence>,
        edges: &[Edge],
        point: Point3,
        index: usize,
        conflicts: &mut Vec<Diagnostic>,
    ) {
        let key = PointKey::new(&point);
        let Some(slot) = endpoints.get_mut(&key) else {
            endpoints.insert(
                key,
                Incidence {
                    primary: index,
                    secondary: None,
                },
            );
            return;
        };
        // Oriented surfaces only see a second start with allow_multiple_starts;
        // unoriented ones always accept a second incidence.
        let second_ok = !self.options.oriented || self.options.allow_multiple_starts;
        if slot.secondary.is_none() && second_ok {
            slot.secondary = Some(index);
            return;
        }
        let involved: Vec<EdgeRef> = slot
            .iter()
            .chain(std::iter::once(index))
            .map(|i| EdgeRef::from(&edges[i]))
            .collect();
        conflicts.push(Diagnostic::NonManifoldVertex {
            point,
            edges: involved,
        });
    }
}

/// Splits sorted edges into maximal runs of equal geometry.
fn equal_runs(edges: &[Edge]) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = 0;
    for n in 1..=edges.len() {
        if n == edges.len() || !edges[n].same_geometry(&edges[start]) {
            runs.push(start..n);
            start = n;
        }
    }
    runs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::segment::SegmentKind;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn edge(segment: usize, number: u8, a: Point3, b: Point3) -> Edge {
        Edge::canonical(segment, number, SegmentKind::PlanarTriangle, None, None, &[a, b])
    }

    /// Two triangles sharing the diagonal of the unit square.
    fn square(flip_second: bool) -> Vec<Edge> {
        let (a, b, c, d) = (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0));
        let mut edges = vec![edge(0, 0, a, b), edge(0, 1, b, c), edge(0, 2, c, a)];
        if flip_second {
            edges.extend([edge(1, 0, a, d), edge(1, 1, d, c), edge(1, 2, c, a)]);
        } else {
            edges.extend([edge(1, 0, a, c), edge(1, 1, c, d), edge(1, 2, d, a)]);
        }
        edges
    }

    #[test]
    fn matched_pair_and_boundary() {
        let v = Validator::default().validate(square(false), Vec::new());
        assert!(v.well_formed);
        assert_eq!(v.edges.len(), 6);
        assert_eq!(v.runs.len(), 5);
        assert_eq!(v.boundary.len(), 4);
        assert_eq!(v.endpoints.len(), 4);
        assert!(v.endpoints.values().all(|i| i.secondary.is_none()));
    }

    #[test]
    fn same_direction_pair_conflicts_when_oriented() {
        let v = Validator::default().validate(square(true), Vec::new());
        assert!(!v.well_formed);
        assert!(v
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::OrientationConflict { .. })));
    }

    #[test]
    fn same_direction_pair_is_fine_when_unoriented() {
        let options = BoundaryOptions {
            oriented: false,
            ..BoundaryOptions::default()
        };
        let v = Validator::new(options).validate(square(true), Vec::new());
        assert!(v.well_formed, "{:?}", v.diagnostics);
        assert!(v.endpoints.values().all(|i| i.secondary.is_some()));
    }

    #[test]
    fn triple_edge_is_reported_with_every_member() {
        let (a, b) = (p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0));
        let edges = vec![edge(0, 0, a, b), edge(1, 2, b, a), edge(2, 1, a, b)];
        let v = Validator::default().validate(edges, Vec::new());
        assert!(!v.well_formed);
        let Some(Diagnostic::EdgeMultiplicity { edges }) = v.diagnostics.first() else {
            panic!("expected multiplicity conflict, got {:?}", v.diagnostics);
        };
        let mut segments: Vec<usize> = edges.iter().map(|e| e.segment).collect();
        segments.sort_unstable();
        assert_eq!(segments, vec![0, 1, 2]);
    }

    #[test]
    fn second_start_needs_allow_multiple_starts() {
        // two triangles touching at the origin only
        let o = p(0.0, 0.0, 0.0);
        let edges = vec![
            edge(0, 0, o, p(1.0, 0.0, 0.0)),
            edge(0, 1, p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)),
            edge(0, 2, p(0.0, 1.0, 0.0), o),
            edge(1, 0, o, p(-1.0, 0.0, 0.0)),
            edge(1, 1, p(-1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)),
            edge(1, 2, p(0.0, -1.0, 0.0), o),
        ];
        let strict = Validator::default().validate(edges.clone(), Vec::new());
        assert!(!strict.well_formed);
        assert!(matches!(
            strict.diagnostics.as_slice(),
            [Diagnostic::NonManifoldVertex { .. }]
        ));

        let relaxed = Validator::new(BoundaryOptions {
            allow_multiple_starts: true,
            ..BoundaryOptions::default()
        })
        .validate(edges, Vec::new());
        assert!(relaxed.well_formed);
        let origin = relaxed.endpoints[&PointKey::new(&o)];
        assert!(origin.secondary.is_some());
    }

    #[test]
    fn partner_lookup() {
        let v = Validator::default().validate(square(false), Vec::new());
        let shared: Vec<usize> = (0..v.edges.len()).filter(|&i| v.partner(i).is_some()).collect();
        assert_eq!(shared.len(), 2);
        let other = v.partner(shared[0]).unwrap();
        assert_eq!(other, shared[1]);
        assert_ne!(v.edges[shared[0]].owning_segment, v.edges[other].owning_segment);
    }

    #[test]
    fn counter_counts_runs() {
        let counter = Arc::new(AtomicUsize::new(0));
        let validator = Validator::default().with_counter(Arc::clone(&counter));
        let _ = validator.validate(square(false), Vec::new());
        let _ = validator.validate(Vec::new(), Vec::new());
        assert_eq!(counter.load(AtomicOrdering::Relaxed), 2);
    }

    #[test]
    fn extraction_diagnostics_make_result_malformed() {
        let diag = Diagnostic::AdjacentDegenerateEdges {
            segment: 0,
            first: 0,
            second: 1,
            tag: None,
        };
        let v = Validator::default().validate(Vec::new(), vec![diag]);
        assert!(!v.well_formed);
        assert!(v.runs.is_empty());
    }
}
