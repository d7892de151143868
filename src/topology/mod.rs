//! Edge-based topology analysis.
//!
//! Segments are reduced to canonical edges, the edges are validated against
//! the manifold rules, and a well-formed result is turned into boundary
//! curves and connected components.

pub mod boundary;
pub mod components;
pub mod diagnostic;
pub mod edge;
pub mod extract;
pub mod validate;

pub use boundary::{build_path, BoundaryPath, PathCommand};
pub use components::{partition, Component};
pub use diagnostic::{write_diagnostics, Diagnostic, EdgeRef};
pub use edge::{Edge, Traversal};
pub use extract::{extract_edges, Extraction};
pub use validate::{BoundaryOptions, Incidence, Validation, Validator};

use tracing::debug;

use crate::segment::SegmentRef;

/// Complete topology of a set of segments.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub validation: Validation,
    /// Boundary curves; `None` unless the segments are well formed.
    pub boundary: Option<BoundaryPath>,
    /// Number of segments analysed.
    pub segment_count: usize,
}

impl Analysis {
    /// Returns `true` if no defect was found.
    #[must_use]
    pub fn well_formed(&self) -> bool {
        self.validation.well_formed
    }

    /// Every defect found, in detection order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.validation.diagnostics
    }

    /// Connected components; empty unless the segments are well formed.
    #[must_use]
    pub fn components(&self) -> Vec<Component> {
        if self.well_formed() {
            partition(&self.validation, self.segment_count)
        } else {
            Vec::new()
        }
    }
}

/// Extracts, validates and traces the boundary of `segments`.
///
/// Segment indices in the result are those carried by the [`SegmentRef`]s.
pub fn analyze<'a>(
    segments: impl IntoIterator<Item = SegmentRef<'a>>,
    validator: &Validator,
) -> Analysis {
    let mut edges = Vec::new();
    let mut diagnostics = Vec::new();
    let mut segment_count = 0;
    for segment in segments {
        let extraction = extract_edges(&segment);
        edges.extend(extraction.edges);
        diagnostics.extend(extraction.diagnostics);
        segment_count = segment_count.max(segment.index + 1);
    }

    let mut validation = validator.validate(edges, diagnostics);
    let boundary = if validation.well_formed {
        let (path, problems) = build_path(&validation);
        if problems.is_empty() {
            Some(path)
        } else {
            validation.diagnostics.extend(problems);
            validation.well_formed = false;
            None
        }
    } else {
        None
    };

    debug!(
        segments = segment_count,
        edges = validation.edges.len(),
        boundary_edges = validation.boundary.len(),
        well_formed = validation.well_formed,
        "analyzed surface topology"
    );

    Analysis {
        validation,
        boundary,
        segment_count,
    }
}
