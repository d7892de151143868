use std::fmt;

use thiserror::Error;

use crate::math::Point3;
use crate::segment::Tag;

use super::edge::Edge;

/// Identifies one local edge of a segment in a diagnostic.
#[derive(Debug, Clone)]
pub struct EdgeRef {
    pub segment: usize,
    pub edge: u8,
    pub tag: Option<Tag>,
}

impl From<&Edge> for EdgeRef {
    fn from(edge: &Edge) -> Self {
        Self {
            segment: edge.owning_segment,
            edge: edge.local_edge_number,
            tag: edge.tag.clone(),
        }
    }
}

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "segment {} edge {}", self.segment, self.edge)?;
        if let Some(tag) = &self.tag {
            write!(f, " (created at {tag})")?;
        }
        Ok(())
    }
}

struct EdgeList<'a>(&'a [EdgeRef]);

impl fmt::Display for EdgeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (n, edge) in self.0.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{edge}")?;
        }
        Ok(())
    }
}

struct TagSuffix<'a>(Option<&'a Tag>);

impl fmt::Display for TagSuffix<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(tag) => write!(f, " (created at {tag})"),
            None => Ok(()),
        }
    }
}

/// A geometric defect found while analysing a surface.
///
/// Any diagnostic makes the surface malformed.
#[derive(Debug, Clone, Error)]
pub enum Diagnostic {
    #[error("edge loop: {edge} has coincident endpoints but distinct interior points")]
    EdgeLoop { edge: EdgeRef },

    #[error(
        "segment {segment} has adjacent degenerate edges {first} and {second}{}",
        TagSuffix(.tag.as_ref())
    )]
    AdjacentDegenerateEdges {
        segment: usize,
        first: u8,
        second: u8,
        tag: Option<Tag>,
    },

    #[error("edges not traversed in opposite directions: {first} and {second}")]
    OrientationConflict { first: EdgeRef, second: EdgeRef },

    #[error("edge shared by {} segments: {}", .edges.len(), EdgeList(.edges.as_slice()))]
    EdgeMultiplicity { edges: Vec<EdgeRef> },

    #[error(
        "non-manifold vertex at ({}, {}, {}): {}",
        .point.x, .point.y, .point.z, EdgeList(.edges.as_slice())
    )]
    NonManifoldVertex { point: Point3, edges: Vec<EdgeRef> },

    #[error("boundary is not closed after {edge}")]
    BoundaryNotClosed { edge: EdgeRef },
}

impl Diagnostic {
    /// Segment indices the diagnostic refers to.
    #[must_use]
    pub fn segments(&self) -> Vec<usize> {
        match self {
            Self::EdgeLoop { edge } | Self::BoundaryNotClosed { edge } => vec![edge.segment],
            Self::AdjacentDegenerateEdges { segment, .. } => vec![*segment],
            Self::OrientationConflict { first, second } => vec![first.segment, second.segment],
            Self::EdgeMultiplicity { edges } | Self::NonManifoldVertex { edges, .. } => {
                edges.iter().map(|e| e.segment).collect()
            }
        }
    }
}

/// Writes one line per diagnostic to `sink`.
///
/// # Errors
///
/// Returns an error if the sink rejects a write.
pub fn write_diagnostics(diagnostics: &[Diagnostic], sink: &mut dyn fmt::Write) -> fmt::Result {
    for diagnostic in diagnostics {
        writeln!(sink, "{diagnostic}")?;
    }
    Ok(())
}
